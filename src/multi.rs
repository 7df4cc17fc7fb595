//! Sequential step executor for composite operations
//!
//! A composite operation is a list of primitive calls run in order. Each step
//! is tagged [`Step::MustSucceed`] or [`Step::IgnoreResult`]:
//!
//! - a `MustSucceed` step runs only while every earlier `MustSucceed` step has
//!   succeeded; once one fails the remaining `MustSucceed` steps are skipped
//!   and their futures are dropped unpolled, so they never reach the network.
//! - an `IgnoreResult` step always runs and its outcome never changes the
//!   composite result.
//!
//! The reported outcome is picked by [`Primary`].

use crate::reference::AuthorizationToken;
use crate::types::Response;
use crate::Result;
use std::future::Future;
use tracing::{debug, warn};

/// How a step's outcome affects the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Skipped after an earlier failure; a failure here stops the chain
    MustSucceed,
    /// Always run, outcome discarded
    IgnoreResult,
}

/// Which step's outcome the composite reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primary {
    /// The last `MustSucceed` step that ran
    #[default]
    LastStep,
    /// The first step that ran
    FirstStep,
}

/// Accumulated outcomes of a composite operation
#[derive(Debug, Clone, Default)]
pub struct MultiResponse {
    primary: Primary,
    responses: Vec<Response>,
    primary_index: Option<usize>,
    failed: bool,
}

impl MultiResponse {
    /// Create an executor reporting the last step
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor reporting the given step
    pub fn with_primary(primary: Primary) -> Self {
        Self {
            primary,
            ..Self::default()
        }
    }

    /// Run one step.
    ///
    /// Precondition errors from a `MustSucceed` step are returned; the same
    /// errors from an `IgnoreResult` step are logged and swallowed.
    pub async fn process<F>(&mut self, step: Step, call: F) -> Result<()>
    where
        F: Future<Output = Result<Response>>,
    {
        if step == Step::MustSucceed && self.failed {
            debug!("Skipping step after an earlier failure");
            return Ok(());
        }

        let response = match (step, call.await) {
            (_, Ok(response)) => response,
            (Step::IgnoreResult, Err(e)) => {
                warn!("Ignored step could not run: {}", e);
                return Ok(());
            }
            (Step::MustSucceed, Err(e)) => return Err(e),
        };

        self.responses.push(response);
        if step == Step::MustSucceed {
            if !self.responses[self.responses.len() - 1].success {
                self.failed = true;
            }
            self.primary_index = Some(self.responses.len() - 1);
        }
        Ok(())
    }

    /// Outcome selected by the primary policy
    pub fn primary_response(&self) -> Option<&Response> {
        match self.primary {
            Primary::FirstStep => self.responses.first(),
            Primary::LastStep => self.primary_index.and_then(|i| self.responses.get(i)),
        }
    }

    /// Whether no `MustSucceed` step has failed
    pub fn is_success(&self) -> bool {
        !self.failed
    }

    /// Running token, taken from the primary outcome
    pub fn authorization(&self) -> Option<&AuthorizationToken> {
        self.primary_response()?.authorization.as_ref()
    }

    /// Running token for chaining, empty when none was produced
    pub fn authorization_or_empty(&self) -> AuthorizationToken {
        self.authorization()
            .cloned()
            .unwrap_or_else(|| AuthorizationToken::new(""))
    }

    /// Every outcome recorded, in call order
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Consume the executor, yielding the primary outcome.
    ///
    /// An executor with no recorded outcome reports a failure.
    pub fn into_response(mut self) -> Response {
        let index = match self.primary {
            Primary::FirstStep => (!self.responses.is_empty()).then_some(0),
            Primary::LastStep => self.primary_index,
        };
        match index {
            Some(i) => self.responses.swap_remove(i),
            None => Response::new(false, Some("No step was run".to_string()), Default::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayError;
    use serde_json::Map;
    use std::cell::Cell;

    fn outcome(success: bool, token: &str) -> Response {
        Response::new(success, Some(token.to_string()), Map::new())
            .with_authorization(Some(AuthorizationToken::from(token)))
    }

    #[tokio::test]
    async fn test_last_step_wins_by_default() {
        let mut multi = MultiResponse::new();
        multi.process(Step::MustSucceed, async { Ok(outcome(true, "a#1#")) }).await.unwrap();
        multi.process(Step::MustSucceed, async { Ok(outcome(true, "a#2#")) }).await.unwrap();

        assert!(multi.is_success());
        assert_eq!(multi.authorization().unwrap().as_str(), "a#2#");
        assert_eq!(multi.responses().len(), 2);
        assert_eq!(multi.into_response().message.as_deref(), Some("a#2#"));
    }

    #[tokio::test]
    async fn test_failure_skips_later_steps() {
        let polled = Cell::new(false);
        let mut multi = MultiResponse::new();
        multi.process(Step::MustSucceed, async { Ok(outcome(false, "a#1#")) }).await.unwrap();
        multi
            .process(Step::MustSucceed, async {
                polled.set(true);
                Ok(outcome(true, "a#2#"))
            })
            .await
            .unwrap();

        assert!(!polled.get());
        assert!(!multi.is_success());
        assert_eq!(multi.responses().len(), 1);
        assert_eq!(multi.into_response(), outcome(false, "a#1#"));
    }

    #[tokio::test]
    async fn test_ignored_step_runs_after_failure_and_is_discarded() {
        let mut multi = MultiResponse::with_primary(Primary::FirstStep);
        multi.process(Step::MustSucceed, async { Ok(outcome(false, "a#1#")) }).await.unwrap();
        multi.process(Step::IgnoreResult, async { Ok(outcome(true, "a#2#")) }).await.unwrap();

        assert!(!multi.is_success());
        assert_eq!(multi.responses().len(), 2);
        assert_eq!(multi.into_response(), outcome(false, "a#1#"));
    }

    #[tokio::test]
    async fn test_ignored_failure_does_not_fail_chain() {
        let mut multi = MultiResponse::with_primary(Primary::FirstStep);
        multi.process(Step::MustSucceed, async { Ok(outcome(true, "a#1#")) }).await.unwrap();
        multi.process(Step::IgnoreResult, async { Ok(outcome(false, "a#2#")) }).await.unwrap();
        multi
            .process(Step::IgnoreResult, async { Err(GatewayError::missing_reference("cancel")) })
            .await
            .unwrap();

        assert!(multi.is_success());
        assert_eq!(multi.into_response(), outcome(true, "a#1#"));
    }

    #[tokio::test]
    async fn test_precondition_error_propagates() {
        let mut multi = MultiResponse::new();
        let err = multi
            .process(Step::MustSucceed, async { Err(GatewayError::missing_option("order_id")) })
            .await
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(multi.responses().is_empty());
    }

    #[test]
    fn test_empty_executor() {
        let multi = MultiResponse::new();
        assert_eq!(multi.authorization_or_empty().as_str(), "");
        let response = multi.into_response();
        assert!(!response.success);
    }
}
