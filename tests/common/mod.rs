//! Shared fixtures for the integration tests

#![allow(dead_code)]

use adyen_gateway::{AdyenGateway, CardDetails, GatewayConfig, GatewayOptions, PaymentMethod};
use serde_json::{json, Value};

pub fn gateway(server_url: &str) -> AdyenGateway {
    let config = GatewayConfig::new("ws@Company.Example", "password", "ExampleMerchant")
        .with_test(true)
        .with_endpoint(server_url);
    AdyenGateway::new(config).unwrap()
}

pub fn credit_card() -> PaymentMethod {
    CardDetails::new("4111111111111111", 8, 2030, "John Smith")
        .with_verification_value("737")
        .into()
}

pub fn declined_card() -> PaymentMethod {
    CardDetails::new("4000300011112220", 8, 2030, "John Smith")
        .with_verification_value("737")
        .into()
}

pub fn options() -> GatewayOptions {
    GatewayOptions::new()
        .with_order_id("345123")
        .with_shopper_email("john.smith@test.com")
        .with_shopper_ip("77.110.174.153")
        .with_shopper_reference("John Smith")
}

pub fn successful_authorize() -> String {
    json!({
        "additionalData": { "liabilityShift": "false" },
        "pspReference": "7914775043909934",
        "resultCode": "Authorised",
        "authCode": "50055"
    })
    .to_string()
}

pub fn failed_authorize() -> String {
    json!({
        "pspReference": "8514775559000000",
        "refusalReason": "Expired Card",
        "resultCode": "Refused",
        "additionalData": { "refusalReasonRaw": "EXPIRED_CARD" }
    })
    .to_string()
}

pub fn modification_received(action: &str, psp_reference: &str) -> String {
    json!({
        "pspReference": psp_reference,
        "response": format!("{}-received", action)
    })
    .to_string()
}

pub fn validation_error(code: &str, message: &str) -> String {
    json!({
        "status": 422,
        "errorCode": code,
        "message": message,
        "errorType": "validation"
    })
    .to_string()
}

pub fn body_json(partial: Value) -> mockito::Matcher {
    mockito::Matcher::PartialJson(partial)
}
