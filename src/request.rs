//! Request document and the field adders that populate it
//!
//! Each primitive call starts from [`init_post`] and runs a fixed pipeline of
//! adders over a fresh [`OperationRequest`]. The document is serialized once
//! and dropped when the call returns.

use crate::config::GatewayConfig;
use crate::reference::AuthorizationToken;
use crate::types::{Address, CardDetails, GatewayOptions, Money, PaymentMethod, ShopperInteraction};
use crate::{GatewayError, Result};
use serde_json::{json, Map, Value};

/// Placeholder the processor accepts for unknown address parts
const NOT_AVAILABLE: &str = "N/A";

/// Key/value document sent as the JSON body of one remote call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationRequest {
    fields: Map<String, Value>,
}

impl OperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Reference to the transaction this request modifies, if any
    pub fn original_reference(&self) -> Option<&str> {
        self.get_str("originalReference").filter(|r| !r.is_empty())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    fn card_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.fields.get_mut("card").and_then(Value::as_object_mut)
    }
}

/// Start a request with the merchant account and order reference
pub fn init_post(config: &GatewayConfig, options: &GatewayOptions) -> OperationRequest {
    let mut post = OperationRequest::new();
    let merchant_account = options
        .merchant_account
        .as_deref()
        .unwrap_or(&config.merchant_account);
    post.insert("merchantAccount", merchant_account);
    if let Some(order_id) = &options.order_id {
        post.insert("reference", order_id.as_str());
    }
    post
}

/// Fail before any network traffic when the order id is missing
pub fn require_order_id(options: &GatewayOptions) -> Result<()> {
    match options.order_id.as_deref() {
        Some(order_id) if !order_id.is_empty() => Ok(()),
        _ => Err(GatewayError::missing_option("order_id")),
    }
}

fn amount_value(money: Money, config: &GatewayConfig, options: &GatewayOptions) -> Value {
    let currency = options
        .currency
        .as_deref()
        .unwrap_or(&config.default_currency);
    json!({
        "value": money.cents(),
        "currency": currency,
    })
}

/// Amount of a new authorisation
pub fn add_invoice(post: &mut OperationRequest, money: Money, config: &GatewayConfig, options: &GatewayOptions) {
    post.insert("amount", amount_value(money, config, options));
}

/// Amount of a capture or refund
pub fn add_invoice_for_modification(
    post: &mut OperationRequest,
    money: Money,
    config: &GatewayConfig,
    options: &GatewayOptions,
) {
    post.insert("modificationAmount", amount_value(money, config, options));
}

/// Card fields or the stored-credential selector
pub fn add_payment(post: &mut OperationRequest, payment: &PaymentMethod) -> Result<()> {
    match payment {
        PaymentMethod::StoredCredential(token) => {
            let recurring = token.recurring_reference();
            if recurring.is_empty() {
                return Err(GatewayError::missing_reference("stored credential"));
            }
            post.insert("selectedRecurringDetailReference", recurring);
            add_recurring_contract(post);
            Ok(())
        }
        PaymentMethod::Card(card) => add_card(post, card),
    }
}

/// Card object with blank fields dropped
pub fn add_card(post: &mut OperationRequest, card: &CardDetails) -> Result<()> {
    let mut fields = Map::new();
    if card.month != 0 {
        fields.insert("expiryMonth".into(), card.month.to_string().into());
    }
    if card.year != 0 {
        fields.insert("expiryYear".into(), card.year.to_string().into());
    }
    if !card.name.trim().is_empty() {
        fields.insert("holderName".into(), card.name.as_str().into());
    }
    if !card.number.trim().is_empty() {
        fields.insert("number".into(), card.number.as_str().into());
    }
    if let Some(cvc) = card.verification_value.as_deref().filter(|v| !v.trim().is_empty()) {
        fields.insert("cvc".into(), cvc.into());
    }

    for required in ["expiryMonth", "expiryYear", "holderName", "number"] {
        if !fields.contains_key(required) {
            return Err(GatewayError::missing_field(required));
        }
    }

    post.insert("card", Value::Object(fields));
    Ok(())
}

/// Optional shopper and order metadata
pub fn add_extra_data(post: &mut OperationRequest, options: &GatewayOptions) {
    if let Some(email) = &options.shopper_email {
        post.insert("shopperEmail", email.as_str());
    }
    if let Some(ip) = &options.shopper_ip {
        post.insert("shopperIP", ip.as_str());
    }
    if let Some(reference) = &options.shopper_reference {
        post.insert("shopperReference", reference.as_str());
    }
    if let Some(offset) = options.fraud_offset {
        post.insert("fraudOffset", offset);
    }
    if let Some(brand) = &options.selected_brand {
        post.insert("selectedBrand", brand.as_str());
    }
    if let Some(date) = &options.delivery_date {
        post.insert("deliveryDate", date.to_rfc3339());
    }
    if let Some(reference) = &options.merchant_order_reference {
        post.insert("merchantOrderReference", reference.as_str());
    }
}

/// `Ecommerce` when the shopper typed a CVC, `ContAuth` otherwise
pub fn add_shopper_interaction(
    post: &mut OperationRequest,
    payment: &PaymentMethod,
    options: &GatewayOptions,
) {
    let derived = if payment.has_verification_value() {
        ShopperInteraction::Ecommerce
    } else {
        ShopperInteraction::ContAuth
    };
    let interaction = options.shopper_interaction.unwrap_or(derived);
    post.insert("shopperInteraction", interaction.as_str());
}

fn address_value(address: &Address) -> Value {
    let mut fields = Map::new();
    let or_na = |part: &Option<String>| part.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    fields.insert("street".into(), or_na(&address.address1).into());
    fields.insert("houseNumberOrName".into(), or_na(&address.address2).into());
    if let Some(zip) = &address.zip {
        fields.insert("postalCode".into(), zip.as_str().into());
    }
    fields.insert("city".into(), or_na(&address.city).into());
    if let Some(state) = &address.state {
        fields.insert("stateOrProvince".into(), state.as_str().into());
    }
    if let Some(country) = &address.country {
        fields.insert("country".into(), country.as_str().into());
    }
    Value::Object(fields)
}

/// Billing address inside the card object, delivery address at top level.
///
/// Addresses without a country are skipped. The billing address is only sent
/// with plain card details.
pub fn add_address(post: &mut OperationRequest, options: &GatewayOptions) {
    let billing = options
        .billing_address
        .as_ref()
        .or(options.address.as_ref())
        .filter(|a| a.country.is_some());
    if let (Some(address), Some(card)) = (billing, post.card_mut()) {
        card.insert("billingAddress".into(), address_value(address));
    }

    if let Some(shipping) = options.shipping_address.as_ref().filter(|a| a.country.is_some()) {
        post.insert("deliveryAddress", address_value(shipping));
    }
}

/// Reference for capture and void
pub fn add_reference(post: &mut OperationRequest, authorization: &AuthorizationToken, action: &'static str) -> Result<()> {
    let reference = authorization.reference();
    if reference.is_empty() {
        return Err(GatewayError::missing_reference(action));
    }
    post.insert("originalReference", reference);
    Ok(())
}

/// Reference for refund: always the original authorisation
pub fn add_original_reference(post: &mut OperationRequest, authorization: &AuthorizationToken) -> Result<()> {
    let reference = authorization.original_reference();
    if reference.is_empty() {
        return Err(GatewayError::missing_reference("refund"));
    }
    post.insert("originalReference", reference);
    Ok(())
}

/// Ask the processor to keep the card for later charges
pub fn add_recurring_contract(post: &mut OperationRequest) {
    post.insert("recurring", json!({ "contract": "RECURRING" }));
}
