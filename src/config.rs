//! Gateway configuration
//!
//! Credentials and endpoint selection live in one immutable struct handed to
//! the gateway at construction. Per-call overrides travel in
//! [`crate::GatewayOptions`] and are merged when a request is built.

use crate::types::{metadata, ActionKind};
use crate::{GatewayError, Result};
use base64::{engine::general_purpose, Engine as _};
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Test platform endpoint
pub const TEST_URL: &str = "https://pal-test.adyen.com/pal/servlet/Payment/v18";
/// Default live platform endpoint
pub const LIVE_URL: &str = "https://pal-live.adyen.com/pal/servlet/Payment/v18";

/// Credentials and endpoint for the remote processor
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Web service user name
    pub username: String,
    /// Web service password
    pub password: String,
    /// Merchant account used unless a call overrides it
    pub merchant_account: String,
    /// Send requests to the test platform
    #[serde(default)]
    pub test: bool,
    /// Merchant-specific live endpoint prefix
    #[serde(default)]
    pub subdomain: Option<String>,
    /// Explicit endpoint, wins over every other selection rule
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout, given in (possibly fractional) seconds in files
    #[serde(default, rename = "timeout_secs", deserialize_with = "deserialize_timeout")]
    pub timeout: Option<Duration>,
    /// Currency used when a call does not name one
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_currency() -> String {
    metadata::DEFAULT_CURRENCY.to_string()
}

fn deserialize_timeout<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)?
        .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
        .transpose()
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("username", &self.username)
            .field("password", &"[FILTERED]")
            .field("merchant_account", &self.merchant_account)
            .field("test", &self.test)
            .field("subdomain", &self.subdomain)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("default_currency", &self.default_currency)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new live configuration
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        merchant_account: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            merchant_account: merchant_account.into(),
            test: false,
            subdomain: None,
            endpoint: None,
            timeout: None,
            default_currency: default_currency(),
        }
    }

    /// Use the test platform
    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    /// Use a merchant-specific live endpoint
    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into());
        self
    }

    /// Send every request to this base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the fallback currency
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: GatewayConfig = serde_json::from_str(&content)
            .map_err(|e| GatewayError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| GatewayError::config(format!("{} is required", name)))
        };

        let mut config = Self::new(
            required("ADYEN_USERNAME")?,
            required("ADYEN_PASSWORD")?,
            required("ADYEN_MERCHANT_ACCOUNT")?,
        );

        if let Ok(test) = std::env::var("ADYEN_TEST") {
            config.test = test
                .parse()
                .map_err(|e| GatewayError::config(format!("Invalid ADYEN_TEST: {}", e)))?;
        }

        if let Ok(subdomain) = std::env::var("ADYEN_SUBDOMAIN") {
            config.subdomain = Some(subdomain);
        }

        if let Ok(endpoint) = std::env::var("ADYEN_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(timeout) = std::env::var("ADYEN_TIMEOUT_SECS") {
            let secs: f64 = timeout
                .parse()
                .map_err(|e| GatewayError::config(format!("Invalid ADYEN_TIMEOUT_SECS: {}", e)))?;
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| GatewayError::config(format!("Invalid ADYEN_TIMEOUT_SECS: {}", e)))?;
            config.timeout = Some(timeout);
        }

        if let Ok(currency) = std::env::var("ADYEN_CURRENCY") {
            config.default_currency = currency;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(GatewayError::config("username is required"));
        }

        if self.password.is_empty() {
            return Err(GatewayError::config("password is required"));
        }

        if self.merchant_account.is_empty() {
            return Err(GatewayError::config("merchant_account is required"));
        }

        if self.default_currency.len() != 3 {
            return Err(GatewayError::config(format!(
                "Invalid default currency: {}",
                self.default_currency
            )));
        }

        url::Url::parse(&self.base_url())
            .map_err(|e| GatewayError::config(format!("Invalid endpoint: {}", e)))?;

        Ok(())
    }

    /// Base URL the actions are appended to
    pub fn base_url(&self) -> String {
        if let Some(endpoint) = &self.endpoint {
            endpoint.trim_end_matches('/').to_string()
        } else if self.test {
            TEST_URL.to_string()
        } else if let Some(subdomain) = &self.subdomain {
            format!(
                "https://{}-pal-live.adyenpayments.com/pal/servlet/Payment/v18",
                subdomain
            )
        } else {
            LIVE_URL.to_string()
        }
    }

    /// Full URL for an action
    pub fn url_for(&self, action: ActionKind) -> String {
        format!("{}/{}", self.base_url(), action.as_str())
    }

    /// Value of the Basic `Authorization` header
    pub fn basic_auth(&self) -> String {
        general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// Headers sent with every request
    pub fn request_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Basic {}", self.basic_auth()))
            .map_err(|e| GatewayError::config(format!("Invalid credentials: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config() -> GatewayConfig {
        GatewayConfig::new("ws@Company.Example", "secret", "ExampleMerchant")
    }

    #[test]
    fn test_endpoint_selection() {
        assert_eq!(config().base_url(), LIVE_URL);
        assert_eq!(config().with_test(true).base_url(), TEST_URL);
        assert_eq!(
            config().with_subdomain("1797a841fbb37ca7-AdyenDemo").base_url(),
            "https://1797a841fbb37ca7-AdyenDemo-pal-live.adyenpayments.com/pal/servlet/Payment/v18"
        );
        // test mode wins over the live subdomain
        assert_eq!(
            config().with_test(true).with_subdomain("abc").base_url(),
            TEST_URL
        );
        assert_eq!(
            config()
                .with_test(true)
                .with_endpoint("http://127.0.0.1:1234/")
                .url_for(ActionKind::Capture),
            "http://127.0.0.1:1234/capture"
        );
    }

    #[test]
    fn test_url_for_appends_action() {
        assert_eq!(
            config().with_test(true).url_for(ActionKind::Authorise),
            format!("{}/authorise", TEST_URL)
        );
    }

    #[test]
    fn test_basic_auth_header() {
        let headers = config().request_headers().unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        let expected = format!(
            "Basic {}",
            general_purpose::STANDARD.encode("ws@Company.Example:secret")
        );
        assert_eq!(headers[AUTHORIZATION], expected.as_str());
    }

    #[test]
    fn test_validation() {
        assert!(config().validate().is_ok());
        assert!(GatewayConfig::new("", "p", "m").validate().is_err());
        assert!(GatewayConfig::new("u", "", "m").validate().is_err());
        assert!(GatewayConfig::new("u", "p", "").validate().is_err());
        assert!(config().with_default_currency("EURO").validate().is_err());
        assert!(config().with_endpoint("not a url").validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("ExampleMerchant"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"username":"u","password":"p","merchant_account":"m","test":true,"timeout_secs":5}}"#
        )
        .unwrap();

        let config = GatewayConfig::from_file(file.path()).unwrap();
        assert!(config.test);
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = config().with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));

        let config: GatewayConfig = serde_json::from_str(
            r#"{"username":"u","password":"p","merchant_account":"m","timeout_secs":1.5}"#,
        )
        .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));

        let err = serde_json::from_str::<GatewayConfig>(
            r#"{"username":"u","password":"p","merchant_account":"m","timeout_secs":-1}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_from_file_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GatewayConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GatewayError::Io(_)));
    }

    #[test]
    fn test_from_file_rejects_missing_credentials() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"username":"u","password":"","merchant_account":"m"}}"#).unwrap();

        let err = GatewayConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("password is required"));
    }
}
