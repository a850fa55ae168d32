//! Session-related types.
//!
//! The mock login keeps nothing but a display name; there are no passwords.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_DISPLAY_NAME_CHARS: usize = 64;

/// Validation errors for [`DisplayName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayNameError {
    #[error("display name must not be empty")]
    Empty,
    #[error("display name must be at most {MAX_DISPLAY_NAME_CHARS} characters")]
    TooLong,
    #[error("display name must not contain control characters")]
    ControlCharacter,
}

/// A validated, trimmed user display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Parse and validate a display name.
    ///
    /// # Errors
    ///
    /// Returns `DisplayNameError` if the trimmed name is empty, too long, or
    /// contains control characters.
    pub fn parse(raw: &str) -> Result<Self, DisplayNameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DisplayNameError::Empty);
        }
        if name.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(DisplayNameError::TooLong);
        }
        if name.chars().any(char::is_control) {
            return Err(DisplayNameError::ControlCharacter);
        }
        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used for "already registered" checks.
    #[must_use]
    pub fn same_user(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DisplayNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        assert_eq!(DisplayName::parse("  Ana  ").unwrap().as_str(), "Ana");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(DisplayName::parse("   "), Err(DisplayNameError::Empty));
    }

    #[test]
    fn test_parse_rejects_long() {
        let long = "a".repeat(65);
        assert_eq!(DisplayName::parse(&long), Err(DisplayNameError::TooLong));
        assert!(DisplayName::parse(&"ñ".repeat(64)).is_ok());
    }

    #[test]
    fn test_parse_rejects_control_chars() {
        assert_eq!(
            DisplayName::parse("Ana\u{7}"),
            Err(DisplayNameError::ControlCharacter)
        );
    }

    #[test]
    fn test_same_user_ignores_case() {
        let a = DisplayName::parse("Lucía").unwrap();
        let b = DisplayName::parse("LUCÍA").unwrap();
        assert!(a.same_user(&b));
    }

    #[test]
    fn test_serde_validates() {
        let names: Vec<DisplayName> = serde_json::from_str(r#"["Ana", "Bruno"]"#).unwrap();
        assert_eq!(names.len(), 2);
        assert!(serde_json::from_str::<Vec<DisplayName>>(r#"[""]"#).is_err());
    }
}
