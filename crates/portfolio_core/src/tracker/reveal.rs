//! Fade/slide-in reveal tracking.
//!
//! A section is revealed while at least `threshold` of it is in view and is
//! hidden again once it drops below, so the animation replays on every
//! re-entry. Releasing a revealed section's registration hides it and
//! notifies subscribers.

use crate::model::section::{Section, SectionId};
use crate::tracker::observed::{
    self, Deferred, ListenerGuard, ListenerSet, Observation, Observed,
};
use crate::tracker::source::{ElementHandle, VisibilityEntry, VisibilitySource};
use crate::tracker::{validate_threshold, SectionRegistration, TrackerError};
use log::{debug, info};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Listener notified with `(section, revealed)` for each change.
pub type RevealListener = dyn Fn(&SectionId, bool);

struct RevealState {
    observation: Observation,
    threshold: f64,
    revealed: BTreeSet<SectionId>,
    listeners: ListenerSet<RevealListener>,
}

impl Observed for RevealState {
    fn observation(&self) -> &Observation {
        &self.observation
    }

    fn observation_mut(&mut self) -> &mut Observation {
        &mut self.observation
    }

    fn released(&mut self, section: &SectionId) -> Option<Deferred> {
        if !self.revealed.remove(section) {
            return None;
        }
        debug!(
            "event=reveal_changed module=tracker status=released section={}",
            section
        );
        let listeners = self.listeners.snapshot();
        let section = section.clone();
        Some(Box::new(move || {
            for listener in &listeners {
                listener(&section, false);
            }
        }))
    }
}

/// Tracks which sections are currently revealed.
pub struct RevealTracker {
    state: Rc<RefCell<RevealState>>,
    source: Rc<dyn VisibilitySource>,
}

impl RevealTracker {
    pub fn new(
        sections: &[Section],
        threshold: f64,
        source: Rc<dyn VisibilitySource>,
    ) -> Result<Self, TrackerError> {
        validate_threshold("reveal_threshold", threshold)?;
        if sections.is_empty() {
            return Err(TrackerError::NoSections);
        }

        let state = Rc::new(RefCell::new(RevealState {
            observation: Observation::new(
                sections.iter().map(|section| section.id.clone()).collect(),
            ),
            threshold,
            revealed: BTreeSet::new(),
            listeners: ListenerSet::new(),
        }));

        let weak = Rc::downgrade(&state);
        let subscription = source.subscribe(
            threshold,
            Box::new(move |batch: &[VisibilityEntry]| {
                if let Some(state) = weak.upgrade() {
                    apply_batch(&state, batch);
                }
            }),
        );
        state.borrow_mut().observation.bind(subscription);

        info!(
            "event=reveal_init module=tracker status=ok sections={} threshold={}",
            sections.len(),
            threshold
        );
        Ok(Self { state, source })
    }

    pub fn is_revealed(&self, section: &str) -> bool {
        self.state.borrow().revealed.contains(section)
    }

    /// Returns revealed section ids in document order.
    pub fn revealed(&self) -> Vec<SectionId> {
        let state = self.state.borrow();
        state
            .observation
            .sections()
            .iter()
            .filter(|id| state.revealed.contains(*id))
            .cloned()
            .collect()
    }

    pub fn register_section(
        &self,
        section: &str,
        element: ElementHandle,
    ) -> Result<SectionRegistration, TrackerError> {
        observed::register(&self.state, &self.source, section, element)
    }

    pub fn on_visibility_change(&self, batch: &[VisibilityEntry]) {
        apply_batch(&self.state, batch);
    }

    /// Subscribes to reveal changes.
    pub fn subscribe(&self, listener: impl Fn(&SectionId, bool) + 'static) -> ListenerGuard {
        let key = self.state.borrow_mut().listeners.insert(Rc::new(listener));
        let weak = Rc::downgrade(&self.state);
        ListenerGuard::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.remove(key);
            }
        })
    }

    pub fn teardown(&self) {
        if observed::teardown(&self.state, self.source.as_ref()) {
            let mut state = self.state.borrow_mut();
            state.revealed.clear();
            state.listeners.clear();
            info!("event=reveal_teardown module=tracker status=ok");
        }
    }
}

impl Drop for RevealTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn apply_batch(state: &RefCell<RevealState>, batch: &[VisibilityEntry]) {
    let (changes, listeners) = {
        let mut state = state.borrow_mut();
        if !state.observation.is_live() {
            return;
        }

        let mut changes = Vec::new();
        for entry in batch {
            let Some(section) = state.observation.section_for(entry.element).cloned() else {
                continue;
            };
            let revealed = entry.meets(state.threshold);
            let changed = if revealed {
                state.revealed.insert(section.clone())
            } else {
                state.revealed.remove(&section)
            };
            if changed {
                debug!(
                    "event=reveal_changed module=tracker status=ok section={} revealed={}",
                    section, revealed
                );
                changes.push((section, revealed));
            }
        }
        if changes.is_empty() {
            return;
        }
        (changes, state.listeners.snapshot())
    };

    for (section, revealed) in &changes {
        for listener in &listeners {
            listener(section, *revealed);
        }
    }
}
