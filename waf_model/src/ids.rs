// Opaque handles issued by the service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for one pending configuration change.
///
/// Obtained from GetChangeToken, submitted with exactly one mutating call,
/// and echoed back in that call's response so the caller can poll its
/// propagation status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeToken(String);

impl ChangeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ChangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChangeToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for ChangeToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Pagination cursor returned by a list operation when more results remain.
///
/// Callers pass it back unchanged; its contents carry no meaning outside the
/// service that minted it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NextMarker(String);

impl NextMarker {
    /// Wraps a cursor. Only a service implementation has reason to call this.
    pub fn mint(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw cursor, for a service implementation resolving it.
    pub fn resolve(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NextMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NextMarker(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_token_is_a_bare_string_on_the_wire() {
        let token = ChangeToken::new("abcd12f2-46da-4fdb-b8d5-fbd4c466928f");
        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(value, json!("abcd12f2-46da-4fdb-b8d5-fbd4c466928f"));

        let back: ChangeToken = serde_json::from_value(value).unwrap();
        assert_eq!(back, token);
        assert_eq!(back.to_string(), token.as_str());
    }

    #[test]
    fn test_marker_debug_hides_contents() {
        let marker = NextMarker::mint("offset:40");
        assert_eq!(format!("{marker:?}"), "NextMarker(..)");
        assert_eq!(serde_json::to_value(&marker).unwrap(), json!("offset:40"));
    }
}
