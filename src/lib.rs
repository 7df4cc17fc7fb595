//! # adyen-gateway
//!
//! A uniform payment-operations contract (authorize, capture, refund, void,
//! purchase, store, verify) over the Adyen card-processing JSON API.
//!
//! Remote declines, error pages and network faults all come back as a
//! [`Response`] with `success == false`; only caller mistakes such as a
//! missing order id are returned as [`GatewayError`].
//!
//! ```rust,no_run
//! use adyen_gateway::{AdyenGateway, CardDetails, GatewayConfig, GatewayOptions, Money};
//!
//! # async fn example() -> adyen_gateway::Result<()> {
//! let config = GatewayConfig::new("ws@Company.Example", "secret", "ExampleMerchant").with_test(true);
//! let gateway = AdyenGateway::new(config)?;
//!
//! let card = CardDetails::new("4111111111111111", 8, 2030, "John Smith").with_verification_value("737");
//! let options = GatewayOptions::new().with_order_id("order-1");
//!
//! let response = gateway.purchase(Money::from_cents(1000), &card.into(), &options).await?;
//! if let Some(token) = &response.authorization {
//!     gateway.refund(Money::from_cents(1000), token, &options).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod multi;
pub mod reference;
pub mod request;
pub mod response;
pub mod scrub;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::AdyenGateway;
pub use reference::AuthorizationToken;
pub use transport::{HttpTransport, Transport};
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_metadata() {
        assert_eq!(metadata::DISPLAY_NAME, "Adyen");
        assert_eq!(metadata::DEFAULT_CURRENCY, "USD");
        assert_eq!(metadata::SUPPORTED_CARD_TYPES.len(), 8);
        assert!(metadata::SUPPORTED_COUNTRIES.contains(&"GB"));
    }

    #[test]
    fn test_reexports() {
        let token = AuthorizationToken::encode(Some("A"), Some("B"), None).unwrap();
        let method: PaymentMethod = token.into();
        assert!(matches!(method, PaymentMethod::StoredCredential(_)));
    }
}
