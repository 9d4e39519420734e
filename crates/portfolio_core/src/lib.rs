//! Core logic for the portfolio page.
//! This crate is the single source of truth for section order, content and
//! the scroll-driven active/reveal state.

pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod tracker;
pub mod view;
pub mod viewport;

pub use config::{ConfigError, ConfigResult, PortfolioConfig};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, normalize_level,
    LogTarget,
};
pub use model::content::{ContentBlock, ListItem};
pub use model::section::{ContactLink, Section, SectionId, SectionIdError};
pub use render::{render_body, render_nav, render_page, stylesheet, ViewState};
pub use tracker::reveal::RevealTracker;
pub use tracker::section_tracker::SectionTracker;
pub use tracker::source::{
    ElementHandle, ScrollBehavior, ScrollPort, SubscriptionId, VisibilityEntry,
    VisibilityHandler, VisibilitySource,
};
pub use tracker::{ListenerGuard, SectionRegistration, TrackerError, TrackerOptions};
pub use view::PortfolioView;
pub use viewport::{ManualViewport, ScrollRequest, SectionLayout};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
