//! Core types shared by the request builder, the normalizer and the gateway

use crate::reference::AuthorizationToken;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Amount in minor currency units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Create an amount from major units.
    ///
    /// Fractions of a cent are rounded half away from zero, so `10.005`
    /// becomes 1001 cents.
    pub fn from_major(amount: Decimal) -> crate::Result<Self> {
        if amount.is_sign_negative() {
            return Err(crate::GatewayError::invalid_amount(format!(
                "{} is negative",
                amount
            )));
        }
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|cents| cents.to_u64())
            .map(Self)
            .ok_or_else(|| crate::GatewayError::invalid_amount(format!("{} is out of range", amount)))
    }

    /// Get the amount in minor units
    pub fn cents(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Money {
    fn from(cents: u64) -> Self {
        Self(cents)
    }
}

/// Plain card details
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CardDetails {
    /// Primary account number
    pub number: String,
    /// Expiry month (1-12)
    pub month: u32,
    /// Four digit expiry year
    pub year: u32,
    /// Cardholder name
    pub name: String,
    /// CVC / CVV, absent for merchant-initiated charges
    pub verification_value: Option<String>,
}

impl CardDetails {
    /// Create new card details
    pub fn new(number: impl Into<String>, month: u32, year: u32, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            month,
            year,
            name: name.into(),
            verification_value: None,
        }
    }

    /// Set the card verification value
    pub fn with_verification_value(mut self, cvc: impl Into<String>) -> Self {
        self.verification_value = Some(cvc.into());
        self
    }

    /// Whether a non-blank CVC was supplied
    pub fn has_verification_value(&self) -> bool {
        self.verification_value
            .as_deref()
            .is_some_and(|cvc| !cvc.trim().is_empty())
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self
            .number
            .get(self.number.len().saturating_sub(4)..)
            .unwrap_or_default();
        f.debug_struct("CardDetails")
            .field("number", &format!("XXXX{}", last4))
            .field("month", &self.month)
            .field("year", &self.year)
            .field("name", &self.name)
            .field("verification_value", &self.verification_value.as_ref().map(|_| "[FILTERED]"))
            .finish()
    }
}

/// What the shopper pays with
#[derive(Debug, Clone)]
pub enum PaymentMethod {
    /// A token returned by a previous `store`; its recurring slot selects the
    /// stored card
    StoredCredential(AuthorizationToken),
    /// Card details entered by the shopper
    Card(CardDetails),
}

impl PaymentMethod {
    /// Whether the shopper supplied a CVC with this payment
    pub fn has_verification_value(&self) -> bool {
        match self {
            PaymentMethod::Card(card) => card.has_verification_value(),
            PaymentMethod::StoredCredential(_) => false,
        }
    }
}

impl From<CardDetails> for PaymentMethod {
    fn from(card: CardDetails) -> Self {
        PaymentMethod::Card(card)
    }
}

impl From<AuthorizationToken> for PaymentMethod {
    fn from(token: AuthorizationToken) -> Self {
        PaymentMethod::StoredCredential(token)
    }
}

/// Postal address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    pub country: Option<String>,
}

impl Address {
    /// Create an address in the given country
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..Self::default()
        }
    }

    pub fn with_address1(mut self, address1: impl Into<String>) -> Self {
        self.address1 = Some(address1.into());
        self
    }

    pub fn with_address2(mut self, address2: impl Into<String>) -> Self {
        self.address2 = Some(address2.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }
}

/// How the shopper took part in the transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopperInteraction {
    /// Shopper present online
    Ecommerce,
    /// Continued authority, i.e. merchant-initiated with stored details
    ContAuth,
    /// Mail or telephone order
    Moto,
    /// Point of sale
    #[serde(rename = "POS")]
    Pos,
}

impl ShopperInteraction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopperInteraction::Ecommerce => "Ecommerce",
            ShopperInteraction::ContAuth => "ContAuth",
            ShopperInteraction::Moto => "Moto",
            ShopperInteraction::Pos => "POS",
        }
    }
}

/// Per-call options merged over the gateway configuration
#[derive(Debug, Clone, Default)]
pub struct GatewayOptions {
    /// Merchant order identifier, required for authorize and store
    pub order_id: Option<String>,
    /// Currency override (ISO 4217)
    pub currency: Option<String>,
    /// Merchant account override
    pub merchant_account: Option<String>,
    pub shopper_email: Option<String>,
    pub shopper_ip: Option<String>,
    pub shopper_reference: Option<String>,
    /// Offset added to the processor's fraud score
    pub fraud_offset: Option<i64>,
    pub selected_brand: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub merchant_order_reference: Option<String>,
    pub billing_address: Option<Address>,
    /// Generic address, used when no billing address is given
    pub address: Option<Address>,
    pub shipping_address: Option<Address>,
    /// Overrides the interaction derived from the payment method
    pub shopper_interaction: Option<ShopperInteraction>,
}

impl GatewayOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_merchant_account(mut self, merchant_account: impl Into<String>) -> Self {
        self.merchant_account = Some(merchant_account.into());
        self
    }

    pub fn with_shopper_email(mut self, email: impl Into<String>) -> Self {
        self.shopper_email = Some(email.into());
        self
    }

    pub fn with_shopper_ip(mut self, ip: impl Into<String>) -> Self {
        self.shopper_ip = Some(ip.into());
        self
    }

    pub fn with_shopper_reference(mut self, reference: impl Into<String>) -> Self {
        self.shopper_reference = Some(reference.into());
        self
    }

    pub fn with_fraud_offset(mut self, offset: i64) -> Self {
        self.fraud_offset = Some(offset);
        self
    }

    pub fn with_selected_brand(mut self, brand: impl Into<String>) -> Self {
        self.selected_brand = Some(brand.into());
        self
    }

    pub fn with_delivery_date(mut self, date: DateTime<Utc>) -> Self {
        self.delivery_date = Some(date);
        self
    }

    pub fn with_merchant_order_reference(mut self, reference: impl Into<String>) -> Self {
        self.merchant_order_reference = Some(reference.into());
        self
    }

    pub fn with_billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address);
        self
    }

    pub fn with_shopper_interaction(mut self, interaction: ShopperInteraction) -> Self {
        self.shopper_interaction = Some(interaction);
        self
    }
}

/// Remote action, used as the endpoint name and to interpret the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Authorise,
    Capture,
    Refund,
    Cancel,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Authorise => "authorise",
            ActionKind::Capture => "capture",
            ActionKind::Refund => "refund",
            ActionKind::Cancel => "cancel",
        }
    }

    /// Whether this action modifies an existing transaction
    pub fn is_modification(&self) -> bool {
        !matches!(self, ActionKind::Authorise)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processor-independent classification of a failed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardErrorCode {
    IncorrectNumber,
    InvalidNumber,
    InvalidExpiryDate,
    InvalidCvc,
    ExpiredCard,
    IncorrectCvc,
    IncorrectZip,
    IncorrectAddress,
    IncorrectPin,
    CardDeclined,
    ProcessingError,
    CallIssuer,
    PickupCard,
    ConfigError,
    TestModeLiveCard,
    UnsupportedFeature,
}

impl StandardErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardErrorCode::IncorrectNumber => "incorrect_number",
            StandardErrorCode::InvalidNumber => "invalid_number",
            StandardErrorCode::InvalidExpiryDate => "invalid_expiry_date",
            StandardErrorCode::InvalidCvc => "invalid_cvc",
            StandardErrorCode::ExpiredCard => "expired_card",
            StandardErrorCode::IncorrectCvc => "incorrect_cvc",
            StandardErrorCode::IncorrectZip => "incorrect_zip",
            StandardErrorCode::IncorrectAddress => "incorrect_address",
            StandardErrorCode::IncorrectPin => "incorrect_pin",
            StandardErrorCode::CardDeclined => "card_declined",
            StandardErrorCode::ProcessingError => "processing_error",
            StandardErrorCode::CallIssuer => "call_issuer",
            StandardErrorCode::PickupCard => "pickup_card",
            StandardErrorCode::ConfigError => "config_error",
            StandardErrorCode::TestModeLiveCard => "test_mode_live_card",
            StandardErrorCode::UnsupportedFeature => "unsupported_feature",
        }
    }
}

impl fmt::Display for StandardErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical outcome of one remote call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the processor accepted the action
    pub success: bool,
    /// Human readable explanation
    pub message: Option<String>,
    /// Parsed remote payload, empty when the body was not JSON
    pub params: Map<String, Value>,
    /// Token for follow-up calls, absent when no remote id came back
    pub authorization: Option<AuthorizationToken>,
    /// Classification of a failure, absent on success or when unknown
    pub error_code: Option<StandardErrorCode>,
    /// Whether the call went to the test platform
    pub test: bool,
}

impl Response {
    /// Create a new response
    pub fn new(success: bool, message: Option<String>, params: Map<String, Value>) -> Self {
        Self {
            success,
            message,
            params,
            authorization: None,
            error_code: None,
            test: false,
        }
    }

    pub fn with_authorization(mut self, authorization: Option<AuthorizationToken>) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn with_error_code(mut self, error_code: Option<StandardErrorCode>) -> Self {
        self.error_code = error_code;
        self
    }

    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Raw token text, empty when no token was produced
    pub fn authorization_str(&self) -> &str {
        self.authorization
            .as_ref()
            .map(AuthorizationToken::as_str)
            .unwrap_or_default()
    }
}

/// Static facts about the remote processor
pub mod metadata {
    pub const DISPLAY_NAME: &str = "Adyen";
    pub const HOMEPAGE_URL: &str = "https://www.adyen.com/";
    pub const DEFAULT_CURRENCY: &str = "USD";
    /// Amounts are sent as integer minor units
    pub const MONEY_FORMAT: &str = "cents";

    pub const SUPPORTED_COUNTRIES: &[&str] = &[
        "AT", "AU", "BE", "BG", "BR", "CH", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GB",
        "GI", "GR", "HK", "HU", "IE", "IS", "IT", "LI", "LT", "LU", "LV", "MC", "MT", "MX", "NL",
        "NO", "PL", "PT", "RO", "SE", "SG", "SK", "SI", "US",
    ];

    pub const SUPPORTED_CARD_TYPES: &[&str] = &[
        "visa",
        "master",
        "american_express",
        "diners_club",
        "jcb",
        "dankort",
        "maestro",
        "discover",
    ];

    /// Check if a country is supported
    pub fn supports_country(country: &str) -> bool {
        SUPPORTED_COUNTRIES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country))
    }

    /// Check if a card brand is supported
    pub fn supports_card_type(card_type: &str) -> bool {
        SUPPORTED_CARD_TYPES.contains(&card_type)
    }
}
