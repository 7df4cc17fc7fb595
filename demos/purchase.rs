//! Example purchase, refund and card storage against the Adyen test platform
//!
//! Reads credentials from `ADYEN_USERNAME`, `ADYEN_PASSWORD` and
//! `ADYEN_MERCHANT_ACCOUNT`; set `ADYEN_TEST=true` to use the test platform.

use adyen_gateway::{
    AdyenGateway, Address, CardDetails, GatewayConfig, GatewayOptions, Money, PaymentMethod,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    println!("Using endpoint {}", config.base_url());
    let gateway = AdyenGateway::new(config)?;

    let card: PaymentMethod = CardDetails::new("4111111111111111", 3, 2030, "John Smith")
        .with_verification_value("737")
        .into();
    let options = GatewayOptions::new()
        .with_order_id("demo-order-1")
        .with_shopper_email("john.smith@test.com")
        .with_shopper_reference("john-smith")
        .with_billing_address(
            Address::new("NL")
                .with_address1("Simon Carmiggeltstraat 6-50")
                .with_zip("1011 DJ")
                .with_city("Amsterdam"),
        );

    println!("\nPurchasing 10.00...");
    let purchase = gateway.purchase(Money::from_cents(1000), &card, &options).await?;
    println!("  success: {}", purchase.success);
    println!("  message: {}", purchase.message.as_deref().unwrap_or("-"));
    println!("  authorization: {}", purchase.authorization_str());

    if let Some(token) = &purchase.authorization {
        println!("\nRefunding 5.00...");
        let refund = gateway.refund(Money::from_cents(500), token, &options).await?;
        println!("  success: {}", refund.success);
        println!("  message: {}", refund.message.as_deref().unwrap_or("-"));
    }

    println!("\nStoring the card...");
    let stored = gateway.store(&card, &options).await?;
    println!("  success: {}", stored.success);

    if let Some(token) = stored.authorization {
        println!("\nCharging the stored card 2.50...");
        let charge = gateway
            .authorize(
                Money::from_cents(250),
                &PaymentMethod::StoredCredential(token),
                &options.clone().with_order_id("demo-order-2"),
            )
            .await?;
        println!("  success: {}", charge.success);
        println!("  authorization: {}", charge.authorization_str());
    }

    println!("\nVerifying the card...");
    let verify = gateway.verify(&card, &options).await?;
    println!("  success: {}", verify.success);
    if let Some(code) = verify.error_code {
        println!("  error code: {}", code.as_str());
    }

    Ok(())
}
