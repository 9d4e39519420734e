//! Mounted portfolio view.
//!
//! # Responsibility
//! - Tie one config to its active-section and reveal trackers.
//! - Own every section registration for the lifetime of the mount.
//!
//! # Invariants
//! - Registrations are released before the trackers tear down.
//! - Sections whose element cannot be resolved are left unobserved.

use crate::config::PortfolioConfig;
use crate::model::section::{Section, SectionId};
use crate::render::{self, ViewState};
use crate::tracker::reveal::RevealTracker;
use crate::tracker::section_tracker::SectionTracker;
use crate::tracker::source::{ElementHandle, ScrollPort, VisibilitySource};
use crate::tracker::{ListenerGuard, SectionRegistration, TrackerError};
use log::{info, warn};
use std::rc::Rc;

/// One mounted page: config, trackers and their registrations.
pub struct PortfolioView {
    // Declared first so registrations drop before the trackers.
    registrations: Vec<SectionRegistration>,
    config: PortfolioConfig,
    tracker: SectionTracker,
    reveal: RevealTracker,
}

impl PortfolioView {
    /// Visibility subscriptions a mounted view holds on its source.
    pub const TRACKER_COUNT: usize = 2;

    /// Builds trackers for `config` and registers each resolvable section.
    ///
    /// `resolve` maps a section to its rendered element; `None` skips it.
    pub fn mount(
        config: PortfolioConfig,
        source: Rc<dyn VisibilitySource>,
        scroller: Rc<dyn ScrollPort>,
        mut resolve: impl FnMut(&Section) -> Option<ElementHandle>,
    ) -> Result<Self, TrackerError> {
        let tracker = SectionTracker::new(
            &config.sections,
            config.tracking.active_threshold,
            Rc::clone(&source),
            scroller,
        )?;
        let reveal = RevealTracker::new(&config.sections, config.tracking.reveal_threshold, source)?;

        let mut registrations = Vec::with_capacity(config.sections.len() * 2);
        for section in &config.sections {
            let Some(element) = resolve(section) else {
                warn!(
                    "event=section_unresolved module=view status=skipped section={}",
                    section.id
                );
                continue;
            };
            registrations.push(tracker.register_section(section.id.as_str(), element)?);
            registrations.push(reveal.register_section(section.id.as_str(), element)?);
        }

        info!(
            "event=view_mounted module=view status=ok sections={} observed={}",
            config.sections.len(),
            tracker.registered_count()
        );
        Ok(Self {
            registrations,
            config,
            tracker,
            reveal,
        })
    }

    /// Mounts with handles assigned by section position.
    pub fn mount_indexed(
        config: PortfolioConfig,
        source: Rc<dyn VisibilitySource>,
        scroller: Rc<dyn ScrollPort>,
    ) -> Result<Self, TrackerError> {
        let ids: Vec<SectionId> = config.sections.iter().map(|s| s.id.clone()).collect();
        Self::mount(config, source, scroller, move |section| {
            ids.iter()
                .position(|id| *id == section.id)
                .map(|index| section_element(index))
        })
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    pub fn reveal(&self) -> &RevealTracker {
        &self.reveal
    }

    pub fn active(&self) -> SectionId {
        self.tracker.active()
    }

    /// Smooth-scrolls to `section`; unknown ids are ignored.
    pub fn scroll_to_section(&self, section: &str) -> bool {
        self.tracker.scroll_to_section(section)
    }

    pub fn on_active_change(&self, listener: impl Fn(&SectionId) + 'static) -> ListenerGuard {
        self.tracker.subscribe(listener)
    }

    pub fn on_reveal_change(&self, listener: impl Fn(&SectionId, bool) + 'static) -> ListenerGuard {
        self.reveal.subscribe(listener)
    }

    pub fn view_state(&self) -> ViewState {
        ViewState::capture(&self.tracker, Some(&self.reveal))
    }

    pub fn render_page(&self) -> String {
        render::render_page(&self.config, &self.view_state())
    }

    pub fn render_nav(&self) -> String {
        render::render_nav(&self.config, self.tracker.active().as_str())
    }

    /// Releases every registration and tears both trackers down.
    pub fn unmount(mut self) {
        self.registrations.clear();
        self.tracker.teardown();
        self.reveal.teardown();
        info!("event=view_unmounted module=view status=ok");
    }
}

/// Handle used by `mount_indexed` for the section at `index`.
pub fn section_element(index: usize) -> ElementHandle {
    ElementHandle::new(u32::try_from(index).unwrap_or(u32::MAX))
}
