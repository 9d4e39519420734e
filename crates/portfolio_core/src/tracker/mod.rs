//! Scroll-driven section tracking.
//!
//! # Responsibility
//! - Keep the active navigation entry in sync with the most visible section.
//! - Track which sections are revealed for fade/slide-in styling.
//! - Issue smooth-scroll requests for navigation clicks.
//!
//! # Invariants
//! - Tracker state is owned by one tracker instance; there is no global.
//! - Observation registrations are scoped and released on teardown.
//! - Listeners never run while tracker state is borrowed.

mod observed;
pub mod reveal;
pub mod section_tracker;
pub mod source;

pub use observed::{ListenerGuard, SectionRegistration};

use crate::model::section::SectionId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default ratio at which a section becomes the active one.
pub const DEFAULT_ACTIVE_THRESHOLD: f64 = 0.5;
/// Stricter active ratio used by the alternate page layout.
pub const STRICT_ACTIVE_THRESHOLD: f64 = 0.8;
/// Ratio at which a section fades in.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.3;

/// Visibility thresholds used by the trackers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerOptions {
    pub active_threshold: f64,
    pub reveal_threshold: f64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            active_threshold: DEFAULT_ACTIVE_THRESHOLD,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

impl TrackerOptions {
    /// Options requiring most of a section to be visible before it activates.
    pub fn strict() -> Self {
        Self {
            active_threshold: STRICT_ACTIVE_THRESHOLD,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        validate_threshold("active_threshold", self.active_threshold)?;
        validate_threshold("reveal_threshold", self.reveal_threshold)
    }
}

pub(crate) fn validate_threshold(name: &'static str, value: f64) -> Result<(), TrackerError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(TrackerError::InvalidThreshold { name, value })
    }
}

/// Tracker construction and registration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    NoSections,
    InvalidThreshold { name: &'static str, value: f64 },
    UnknownSection(String),
    AlreadyRegistered(SectionId),
    ElementInUse { element: u32, section: SectionId },
    TornDown,
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSections => write!(f, "tracker needs at least one section"),
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} must be within (0, 1], got {value}")
            }
            Self::UnknownSection(value) => write!(f, "section is not configured: {value}"),
            Self::AlreadyRegistered(id) => write!(f, "section already registered: {id}"),
            Self::ElementInUse { element, section } => {
                write!(f, "element {element} is already registered for section {section}")
            }
            Self::TornDown => write!(f, "tracker has been torn down"),
        }
    }
}

impl Error for TrackerError {}
