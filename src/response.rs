//! Response normalization
//!
//! Turns whatever the processor sent back into a [`Response`]. Nothing here
//! fails: a body that is not a JSON object is treated as an empty payload, so
//! an HTML error page still yields `success == false`.

use crate::reference::AuthorizationToken;
use crate::request::OperationRequest;
use crate::types::{ActionKind, Response, StandardErrorCode};
use serde_json::{Map, Value};
use tracing::warn;

/// Result codes that count as an accepted authorisation. Anything else,
/// including codes added to the API later, is a failure.
pub const AUTHORISE_SUCCESS_CODES: &[&str] = &["Authorised", "Received", "RedirectShopper"];

/// Key of the recurring detail reference inside `additionalData`
const RECURRING_DETAIL_KEY: &str = "recurring.recurringDetailReference";

/// Map a remote error code onto the standard vocabulary
pub fn map_error_code(code: &str) -> Option<StandardErrorCode> {
    match code {
        "101" => Some(StandardErrorCode::IncorrectNumber),
        "103" => Some(StandardErrorCode::InvalidCvc),
        "131" | "132" | "133" | "134" | "135" => Some(StandardErrorCode::IncorrectAddress),
        _ => None,
    }
}

/// Parse a raw body, yielding an empty payload for blank or non-object bodies
pub fn parse(body: &str) -> Map<String, Value> {
    if body.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!("Expected a JSON object from the processor, got {}", type_name(&other));
            Map::new()
        }
        Err(e) => {
            warn!("Unparseable response body: {}", e);
            Map::new()
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// String view of a field; numbers are accepted since some codes arrive unquoted
fn field(response: &Map<String, Value>, key: &str) -> Option<String> {
    match response.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn additional_data<'a>(response: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    response
        .get("additionalData")?
        .as_object()?
        .get(key)?
        .as_str()
}

/// Whether the processor accepted the action
pub fn success_from(action: ActionKind, response: &Map<String, Value>) -> bool {
    if action.is_modification() {
        field(response, "response")
            .is_some_and(|status| status == format!("{}-received", action.as_str()))
    } else {
        field(response, "resultCode")
            .is_some_and(|code| AUTHORISE_SUCCESS_CODES.contains(&code.as_str()))
    }
}

/// Human readable message for the outcome
pub fn message_from(action: ActionKind, response: &Map<String, Value>) -> Option<String> {
    match action {
        ActionKind::Authorise => authorise_message_from(response),
        _ => field(response, "response").or_else(|| field(response, "message")),
    }
}

fn authorise_message_from(response: &Map<String, Value>) -> Option<String> {
    let refusal = field(response, "refusalReason");
    if let (Some(reason), Some(raw)) = (&refusal, additional_data(response, "refusalReasonRaw")) {
        return Some(format!("{} | {}", reason, raw));
    }
    refusal
        .or_else(|| field(response, "resultCode"))
        .or_else(|| field(response, "message"))
}

/// Token for follow-up calls.
///
/// The original slot carries the request's `originalReference` forward; a call
/// without one establishes the new psp reference as the original.
pub fn authorization_from(
    request: &OperationRequest,
    response: &Map<String, Value>,
) -> Option<AuthorizationToken> {
    let psp_reference = field(response, "pspReference")?;
    let original_reference = request.original_reference().unwrap_or(psp_reference.as_str());
    let recurring = additional_data(response, RECURRING_DETAIL_KEY);
    AuthorizationToken::encode(Some(original_reference), Some(psp_reference.as_str()), recurring)
}

/// Standard error code, only looked up for failures
pub fn error_code_from(response: &Map<String, Value>) -> Option<StandardErrorCode> {
    field(response, "errorCode").and_then(|code| map_error_code(&code))
}

/// Build the canonical outcome of one call
pub fn normalize(
    action: ActionKind,
    request: &OperationRequest,
    response: Map<String, Value>,
) -> Response {
    let success = success_from(action, &response);
    let message = message_from(action, &response);
    let authorization = authorization_from(request, &response);
    if success && authorization.is_none() {
        warn!(%action, "Processor reported success without a pspReference");
    }
    let error_code = if success {
        None
    } else {
        error_code_from(&response)
    };

    Response::new(success, message, response)
        .with_authorization(authorization)
        .with_error_code(error_code)
}
