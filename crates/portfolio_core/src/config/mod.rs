//! Portfolio configuration: sections, contact links, content and thresholds.
//!
//! # Responsibility
//! - Hold the ordered section list and the content map keyed by section id.
//! - Load configuration from JSON and validate it before anything renders.
//!
//! # Invariants
//! - A validated config has at least one section, unique ids, and content
//!   for every section and nothing else.
//! - Tracker thresholds lie within `(0, 1]`.

mod defaults;

use crate::model::content::ContentBlock;
use crate::model::section::{ContactLink, Section, SectionId};
use crate::tracker::{TrackerError, TrackerOptions};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Full static description of one portfolio page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Document title.
    pub title: String,
    /// Mark shown at the top of the sidebar.
    pub brand: String,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub contacts: Vec<ContactLink>,
    pub content: BTreeMap<SectionId, Vec<ContentBlock>>,
    #[serde(default)]
    pub tracking: TrackerOptions,
}

impl PortfolioConfig {
    /// Parses a config from JSON text and validates it.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        info!(
            "event=config_loaded module=config status=ok sections={} path={}",
            config.sections.len(),
            path.display()
        );
        Ok(config)
    }

    /// Serializes the config as pretty JSON.
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates structural invariants.
    ///
    /// # Errors
    /// - `NoSections` when the section list is empty.
    /// - `EmptyTitle` when a section has a blank navigation label.
    /// - `DuplicateSection` when two sections share an id.
    /// - `MissingContent` / `OrphanContent` when content and sections disagree.
    /// - `Tracking` when a threshold is out of range.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sections.is_empty() {
            return Err(ConfigError::NoSections);
        }

        let mut seen = BTreeSet::new();
        for section in &self.sections {
            if section.title.trim().is_empty() {
                return Err(ConfigError::EmptyTitle(section.id.clone()));
            }
            if !seen.insert(section.id.clone()) {
                return Err(ConfigError::DuplicateSection(section.id.clone()));
            }
            if !self.content.contains_key(&section.id) {
                return Err(ConfigError::MissingContent(section.id.clone()));
            }
        }
        if let Some(orphan) = self.content.keys().find(|id| !seen.contains(*id)) {
            return Err(ConfigError::OrphanContent(orphan.clone()));
        }

        self.tracking.validate().map_err(ConfigError::Tracking)
    }

    /// Returns the first section id; the initial active section.
    pub fn first_section(&self) -> Option<&SectionId> {
        self.sections.first().map(|section| &section.id)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id.as_str() == id)
    }

    /// Returns the content blocks for `id`, empty when absent.
    pub fn content_for(&self, id: &str) -> &[ContentBlock] {
        self.content.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Configuration load and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    NoSections,
    EmptyTitle(SectionId),
    DuplicateSection(SectionId),
    MissingContent(SectionId),
    OrphanContent(SectionId),
    Tracking(TrackerError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::NoSections => write!(f, "config must declare at least one section"),
            Self::EmptyTitle(id) => write!(f, "section title must not be empty: {id}"),
            Self::DuplicateSection(id) => write!(f, "section id is duplicated: {id}"),
            Self::MissingContent(id) => write!(f, "section has no content: {id}"),
            Self::OrphanContent(id) => write!(f, "content references unknown section: {id}"),
            Self::Tracking(err) => write!(f, "invalid tracking options: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Tracking(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, PortfolioConfig};
    use crate::model::content::ContentBlock;
    use crate::model::section::{Section, SectionId};

    fn id(value: &str) -> SectionId {
        SectionId::parse(value).expect("valid id")
    }

    #[test]
    fn default_portfolio_is_valid() {
        let config = PortfolioConfig::default_portfolio();
        config.validate().expect("default config validates");
        assert_eq!(config.first_section(), Some(&id("home")));
    }

    #[test]
    fn rejects_duplicate_sections() {
        let mut config = PortfolioConfig::default_portfolio();
        config.sections.push(Section::new(id("about"), "About again"));
        let err = config.validate().expect_err("duplicate must fail");
        assert!(matches!(err, ConfigError::DuplicateSection(ref dup) if dup == "about"));
    }

    #[test]
    fn rejects_missing_and_orphan_content() {
        let mut config = PortfolioConfig::default_portfolio();
        config.content.remove("projects");
        let err = config.validate().expect_err("missing content must fail");
        assert!(matches!(err, ConfigError::MissingContent(ref missing) if missing == "projects"));

        let mut config = PortfolioConfig::default_portfolio();
        config
            .content
            .insert(id("blog"), vec![ContentBlock::heading("Blog")]);
        let err = config.validate().expect_err("orphan content must fail");
        assert!(matches!(err, ConfigError::OrphanContent(ref orphan) if orphan == "blog"));
    }

    #[test]
    fn rejects_empty_sections_and_blank_titles() {
        let mut config = PortfolioConfig::default_portfolio();
        config.sections.clear();
        config.content.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoSections)));

        let mut config = PortfolioConfig::default_portfolio();
        config.sections[0].title = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyTitle(_))));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = PortfolioConfig::default_portfolio();
        config.tracking.active_threshold = 1.2;
        let err = config.validate().expect_err("threshold must be checked");
        assert!(err.to_string().contains("active_threshold"));
    }

    #[test]
    fn content_for_unknown_section_is_empty() {
        let config = PortfolioConfig::default_portfolio();
        assert!(config.content_for("nope").is_empty());
        assert!(!config.content_for("about").is_empty());
    }
}
