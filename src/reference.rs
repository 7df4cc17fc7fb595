//! Authorization token codec
//!
//! A token threads remote identifiers between dependent calls. It holds up to
//! three ordered slots, `original#psp#recurring`, any of which may be empty.
//! A token without the delimiter is a bare psp reference produced by older
//! integrations and stands in for every slot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Slot delimiter. Adyen references are alphanumeric and never contain it.
pub const DELIMITER: char = '#';

/// Opaque reference to a remote transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationToken(String);

impl AuthorizationToken {
    /// Join the three slots into a token.
    ///
    /// Returns `None` when the remote call produced no psp reference: such a
    /// call cannot be chained and must not yield a token.
    pub fn encode(
        original_reference: Option<&str>,
        psp_reference: Option<&str>,
        recurring_reference: Option<&str>,
    ) -> Option<Self> {
        let psp_reference = psp_reference?;
        Some(Self(format!(
            "{}{DELIMITER}{}{DELIMITER}{}",
            original_reference.unwrap_or_default(),
            psp_reference,
            recurring_reference.unwrap_or_default(),
        )))
    }

    /// Wrap a raw token string as handed back by a caller.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Whether this is the legacy single-reference form.
    pub fn is_bare(&self) -> bool {
        !self.0.contains(DELIMITER)
    }

    /// Reference used when capturing or voiding: the psp reference slot.
    pub fn reference(&self) -> &str {
        self.slot(1)
    }

    /// Reference used when refunding: the original transaction's slot.
    pub fn original_reference(&self) -> &str {
        self.slot(0)
    }

    /// Recurring detail reference used to charge a stored credential.
    pub fn recurring_reference(&self) -> &str {
        self.slot(2)
    }

    /// Raw token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    // A present delimiter with an empty slot yields "", never a neighbouring
    // slot. Callers reject "" before building a request.
    fn slot(&self, index: usize) -> &str {
        if self.is_bare() {
            return &self.0;
        }
        self.0.split(DELIMITER).nth(index).unwrap_or_default()
    }
}

impl fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AuthorizationToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for AuthorizationToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl FromStr for AuthorizationToken {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl AsRef<str> for AuthorizationToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
