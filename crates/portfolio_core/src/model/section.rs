//! Section and contact link model.
//!
//! # Responsibility
//! - Define the navigable unit of the page (`Section`).
//! - Provide a validated identifier type shared by config, tracker and render.
//!
//! # Invariants
//! - `SectionId` always matches `^[a-z][a-z0-9-]*$`; it doubles as DOM id and
//!   URL fragment.
//! - Deserialization runs the same validation as `SectionId::parse`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};

static SECTION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("valid section id regex"));

/// Stable identifier of one page section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Parses and validates a section identifier.
    ///
    /// The value is taken verbatim; padded ids are rejected, not rewritten.
    pub fn parse(value: &str) -> Result<Self, SectionIdError> {
        if value.trim().is_empty() {
            return Err(SectionIdError::Empty);
        }
        if !SECTION_ID_RE.is_match(value) {
            return Err(SectionIdError::Invalid(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectionId {
    type Error = SectionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SectionId> for String {
    fn from(value: SectionId) -> Self {
        value.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Section identifier validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionIdError {
    Empty,
    Invalid(String),
}

impl Display for SectionIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "section id must not be empty"),
            Self::Invalid(value) => write!(
                f,
                "section id is invalid: {value} (expected lowercase letters, digits and '-')"
            ),
        }
    }
}

impl Error for SectionIdError {}

/// One scrollable content block of the page.
///
/// Order in the configured sequence defines both navigation order and
/// vertical document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// Navigation label.
    pub title: String,
}

impl Section {
    pub fn new(id: SectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Sidebar contact entry.
///
/// `href` is rendered as-is; a broken link is a content error, not a runtime
/// fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    pub title: String,
    pub href: String,
}

impl ContactLink {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SectionId, SectionIdError};

    #[test]
    fn parses_valid_ids_verbatim() {
        let id = SectionId::parse("projects").expect("valid id");
        assert_eq!(id.as_str(), "projects");
        assert_eq!(id, "projects");
        assert!(SectionId::parse("work-2024").is_ok());
    }

    #[test]
    fn rejects_padded_ids_instead_of_trimming() {
        assert_eq!(
            SectionId::parse(" projects "),
            Err(SectionIdError::Invalid(" projects ".to_string()))
        );
        assert!(SectionId::parse("home\n").is_err());
        assert!(SectionId::parse("\tabout").is_err());
    }

    #[test]
    fn rejects_empty_and_malformed_ids() {
        assert_eq!(SectionId::parse("  "), Err(SectionIdError::Empty));
        assert_eq!(
            SectionId::parse("About"),
            Err(SectionIdError::Invalid("About".to_string()))
        );
        assert!(SectionId::parse("1st").is_err());
        assert!(SectionId::parse("has space").is_err());
        assert!(SectionId::parse("under_score").is_err());
    }

    #[test]
    fn serde_uses_plain_string_and_validates() {
        let id = SectionId::parse("about").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"about\"");

        let err = serde_json::from_str::<SectionId>("\"Not Valid\"").unwrap_err();
        assert!(err.to_string().contains("section id is invalid"));
    }
}
