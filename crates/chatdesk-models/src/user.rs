//! User identifiers.
//!
//! The backend keys every conversation by a free-form user id. The client
//! never validates it beyond trimming: whatever sits in the identifier field
//! is sent as-is, and a blank field falls back to a fixed id.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier substituted when the identifier field is blank.
pub const DEFAULT_FALLBACK_USER_ID: &str = "test";

/// Identifier of a backend user.
///
/// # Examples
///
/// ```
/// use chatdesk_models::UserId;
///
/// let id = UserId::resolve("  alice ", "test");
/// assert_eq!(id.as_str(), "alice");
///
/// let fallback = UserId::resolve("   ", "test");
/// assert_eq!(fallback.as_str(), "test");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId` from a string slice.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Resolve the identifier from the raw contents of an input field.
    ///
    /// The field is trimmed; if nothing is left, `fallback` is used instead.
    pub fn resolve(field: &str, fallback: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            Self::new(fallback)
        } else {
            Self::new(trimmed)
        }
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for UserId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}
