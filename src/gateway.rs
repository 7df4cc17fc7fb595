//! Caller-facing payment operations
//!
//! Every primitive (`authorize`, `capture`, `refund`, `void`, `store`) builds
//! its own request document, sends it once and normalizes the reply.
//! `purchase` and `verify` chain primitives through [`MultiResponse`].

use crate::config::GatewayConfig;
use crate::multi::{MultiResponse, Primary, Step};
use crate::reference::AuthorizationToken;
use crate::request::{self, OperationRequest};
use crate::response::{normalize, parse};
use crate::transport::{HttpTransport, Transport};
use crate::types::{ActionKind, GatewayOptions, Money, PaymentMethod, Response};
use crate::{scrub, GatewayError, Result};
use http::Method;
use tracing::{debug, info, warn};

/// Adapter over the Adyen payment API
#[derive(Debug, Clone)]
pub struct AdyenGateway<T = HttpTransport> {
    config: GatewayConfig,
    transport: T,
}

impl AdyenGateway<HttpTransport> {
    /// Create a gateway talking HTTP to the configured endpoint
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> AdyenGateway<T> {
    /// Create a gateway over a custom transport
    pub fn with_transport(config: GatewayConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// Get the gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Authorize and, only if that succeeds, capture the same amount.
    ///
    /// A declined authorisation is returned as is and nothing is captured.
    /// So is an accepted one that came back without a psp reference, since
    /// there is nothing to capture against.
    pub async fn purchase(
        &self,
        money: Money,
        payment: &PaymentMethod,
        options: &GatewayOptions,
    ) -> Result<Response> {
        let mut multi = MultiResponse::new();
        multi
            .process(Step::MustSucceed, self.authorize(money, payment, options))
            .await?;
        if multi.is_success() && multi.authorization().is_none() {
            warn!("Authorisation accepted without a reference, not capturing");
            return Ok(multi.into_response());
        }
        let authorization = multi.authorization_or_empty();
        multi
            .process(Step::MustSucceed, self.capture(money, &authorization, options))
            .await?;
        Ok(multi.into_response())
    }

    /// Reserve funds on the shopper's card or stored credential
    pub async fn authorize(
        &self,
        money: Money,
        payment: &PaymentMethod,
        options: &GatewayOptions,
    ) -> Result<Response> {
        request::require_order_id(options)?;
        let mut post = request::init_post(&self.config, options);
        request::add_invoice(&mut post, money, &self.config, options);
        request::add_payment(&mut post, payment)?;
        request::add_extra_data(&mut post, options);
        request::add_shopper_interaction(&mut post, payment, options);
        request::add_address(&mut post, options);
        self.commit(ActionKind::Authorise, post).await
    }

    /// Capture an authorised amount
    pub async fn capture(
        &self,
        money: Money,
        authorization: &AuthorizationToken,
        options: &GatewayOptions,
    ) -> Result<Response> {
        let mut post = request::init_post(&self.config, options);
        request::add_invoice_for_modification(&mut post, money, &self.config, options);
        request::add_reference(&mut post, authorization, "capture")?;
        self.commit(ActionKind::Capture, post).await
    }

    /// Refund against the original authorisation
    pub async fn refund(
        &self,
        money: Money,
        authorization: &AuthorizationToken,
        options: &GatewayOptions,
    ) -> Result<Response> {
        let mut post = request::init_post(&self.config, options);
        request::add_invoice_for_modification(&mut post, money, &self.config, options);
        request::add_original_reference(&mut post, authorization)?;
        self.commit(ActionKind::Refund, post).await
    }

    /// Cancel an authorisation that has not been captured
    pub async fn void(
        &self,
        authorization: &AuthorizationToken,
        options: &GatewayOptions,
    ) -> Result<Response> {
        let mut post = request::init_post(&self.config, options);
        request::add_reference(&mut post, authorization, "void")?;
        self.commit(ActionKind::Cancel, post).await
    }

    /// Store card details for later charges via a zero-amount authorisation.
    ///
    /// The returned token's recurring slot selects the stored card when the
    /// token is later passed as [`PaymentMethod::StoredCredential`].
    pub async fn store(&self, payment: &PaymentMethod, options: &GatewayOptions) -> Result<Response> {
        request::require_order_id(options)?;
        let mut post = request::init_post(&self.config, options);
        request::add_invoice(&mut post, Money::ZERO, &self.config, options);
        request::add_payment(&mut post, payment)?;
        request::add_extra_data(&mut post, options);
        request::add_recurring_contract(&mut post);
        request::add_address(&mut post, options);
        self.commit(ActionKind::Authorise, post).await
    }

    /// Check a card with a zero-amount authorisation, then release it.
    ///
    /// The authorisation's outcome is reported; the void always runs and its
    /// outcome is discarded.
    pub async fn verify(&self, payment: &PaymentMethod, options: &GatewayOptions) -> Result<Response> {
        let mut multi = MultiResponse::with_primary(Primary::FirstStep);
        multi
            .process(Step::MustSucceed, self.authorize(Money::ZERO, payment, options))
            .await?;
        let authorization = multi.authorization_or_empty();
        multi
            .process(Step::IgnoreResult, self.void(&authorization, options))
            .await?;
        Ok(multi.into_response())
    }

    /// Whether transcripts of this gateway can be scrubbed
    pub fn supports_scrubbing(&self) -> bool {
        scrub::supports_scrubbing()
    }

    /// Redact credentials and card data from a transcript
    pub fn scrub(&self, transcript: &str) -> String {
        scrub::scrub(transcript)
    }

    /// Send one request and normalize whatever comes back.
    ///
    /// Transport faults become failed responses; only local faults
    /// (serialization, header construction) are returned as errors.
    async fn commit(&self, action: ActionKind, post: OperationRequest) -> Result<Response> {
        let url = self.config.url_for(action);
        let headers = self.config.request_headers()?;
        let body = post.to_json()?;

        info!(%action, reference = post.get_str("reference").unwrap_or_default(), "Sending request");

        let mut fault = None;
        let raw = match self.transport.send(Method::POST, &url, body, &headers).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%action, error = %e, "Transport fault");
                fault = Some(e.to_string());
                match e {
                    GatewayError::ResponseError { body, .. } => body,
                    _ => String::new(),
                }
            }
        };

        let mut response = normalize(action, &post, parse(&raw)).with_test(self.config.test);
        if response.message.is_none() {
            response.message = fault;
        }

        debug!(
            %action,
            success = response.success,
            message = response.message.as_deref().unwrap_or_default(),
            "Received response"
        );
        Ok(response)
    }
}
