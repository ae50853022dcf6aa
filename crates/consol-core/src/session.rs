//! Session identifiers
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConsolError;

/// Opaque identifier scoping one end-to-end analysis run.
///
/// Session ids double as directory names in the step store and in the
/// rendered-report tree, so [`SessionId::validate`] rejects anything that
/// could escape a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for callers that do not bring their own.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters (used in rendered filenames).
    pub fn prefix(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConsolError> {
        if self.0.trim().is_empty() {
            return Err(ConsolError::InvalidSession("empty session id".to_string()));
        }
        if self.0 == "." || self.0.contains("..") {
            return Err(ConsolError::InvalidSession(format!(
                "session id '{}' contains a relative path component",
                self.0
            )));
        }
        if self.0.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
            return Err(ConsolError::InvalidSession(format!(
                "session id '{}' contains a path separator or control character",
                self.0.escape_debug()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_char_safe() {
        let id = SessionId::new("sessão_1234567");
        assert_eq!(id.prefix(8), "sessão_1");
        assert_eq!(SessionId::new("abc").prefix(8), "abc");
    }

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_rejects_path_escapes() {
        assert!(SessionId::new("").validate().is_err());
        assert!(SessionId::new("../etc").validate().is_err());
        assert!(SessionId::new("a/b").validate().is_err());
        assert!(SessionId::new("session_4241570a_1755907905").validate().is_ok());
    }
}
