//! Active section tracking.
//!
//! # Responsibility
//! - Own the active section id for one page view.
//! - Translate visibility batches into active-section changes.
//! - Forward navigation clicks to the smooth-scroll primitive.
//!
//! # Invariants
//! - The active id is always one of the configured section ids; it starts at
//!   the first one.
//! - Within one batch the last qualifying entry wins (delivery order, not
//!   document order).
//! - After teardown no batch changes state and no scroll request is issued.

use crate::model::section::{Section, SectionId};
use crate::tracker::observed::{self, ListenerGuard, ListenerSet, Observation, Observed};
use crate::tracker::source::{
    ElementHandle, ScrollBehavior, ScrollPort, VisibilityEntry, VisibilitySource,
};
use crate::tracker::{validate_threshold, SectionRegistration, TrackerError};
use log::{debug, info, trace};
use std::cell::RefCell;
use std::rc::Rc;

/// Listener notified with the new active id.
pub type ActiveListener = dyn Fn(&SectionId);

struct TrackerState {
    observation: Observation,
    threshold: f64,
    active: SectionId,
    listeners: ListenerSet<ActiveListener>,
}

impl Observed for TrackerState {
    fn observation(&self) -> &Observation {
        &self.observation
    }

    fn observation_mut(&mut self) -> &mut Observation {
        &mut self.observation
    }
}

/// Keeps the active navigation entry in sync with section visibility.
pub struct SectionTracker {
    state: Rc<RefCell<TrackerState>>,
    source: Rc<dyn VisibilitySource>,
    scroller: Rc<dyn ScrollPort>,
}

impl SectionTracker {
    /// Creates a tracker and subscribes it to `source`.
    ///
    /// # Errors
    /// - `NoSections` when `sections` is empty.
    /// - `InvalidThreshold` when `threshold` is outside `(0, 1]`.
    pub fn new(
        sections: &[Section],
        threshold: f64,
        source: Rc<dyn VisibilitySource>,
        scroller: Rc<dyn ScrollPort>,
    ) -> Result<Self, TrackerError> {
        validate_threshold("active_threshold", threshold)?;
        let first = sections.first().ok_or(TrackerError::NoSections)?;

        let state = Rc::new(RefCell::new(TrackerState {
            observation: Observation::new(
                sections.iter().map(|section| section.id.clone()).collect(),
            ),
            threshold,
            active: first.id.clone(),
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
            "event=tracker_init module=tracker status=ok sections={} threshold={}",
            sections.len(),
            threshold
        );
        Ok(Self {
            state,
            source,
            scroller,
        })
    }

    /// Returns the active section id.
    pub fn active(&self) -> SectionId {
        self.state.borrow().active.clone()
    }

    pub fn is_active(&self, section: &str) -> bool {
        self.state.borrow().active.as_str() == section
    }

    pub fn threshold(&self) -> f64 {
        self.state.borrow().threshold
    }

    /// Returns the configured section ids in document order.
    pub fn sections(&self) -> Vec<SectionId> {
        self.state.borrow().observation().sections().to_vec()
    }

    pub fn registered_count(&self) -> usize {
        self.state.borrow().observation().registered_count()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn is_torn_down(&self) -> bool {
        !self.state.borrow().observation().is_live()
    }

    /// Associates a rendered element with a section and starts observing it.
    ///
    /// # Errors
    /// - `UnknownSection` when `section` is not configured.
    /// - `AlreadyRegistered` when the section already has an element.
    /// - `ElementInUse` when `element` is bound to another section.
    /// - `TornDown` after `teardown`.
    pub fn register_section(
        &self,
        section: &str,
        element: ElementHandle,
    ) -> Result<SectionRegistration, TrackerError> {
        let registration = observed::register(&self.state, &self.source, section, element)?;
        debug!(
            "event=section_registered module=tracker status=ok section={} element={}",
            registration.section(),
            element.raw()
        );
        Ok(registration)
    }

    /// Stops observing `section`. Returns whether anything was released.
    pub fn unregister_section(&self, section: &str) -> bool {
        let (id, binding) = {
            let state = self.state.borrow();
            let observation = state.observation();
            let Some(binding) = observation.binding_for(section) else {
                return false;
            };
            let Some(id) = observation.section_for(binding.element).cloned() else {
                return false;
            };
            (id, binding)
        };
        let released = observed::release(&self.state, self.source.as_ref(), &id, binding);
        if released {
            debug!(
                "event=section_unregistered module=tracker status=ok section={}",
                id
            );
        }
        released
    }

    /// Applies one visibility batch.
    ///
    /// This is the callback the visibility source drives; it is public so
    /// hosts that receive batches through another channel can forward them.
    pub fn on_visibility_change(&self, batch: &[VisibilityEntry]) {
        apply_batch(&self.state, batch);
    }

    /// Requests a smooth scroll to `section`.
    ///
    /// Unknown or unregistered ids are a silent no-op. Returns whether a
    /// scroll request was issued.
    pub fn scroll_to_section(&self, section: &str) -> bool {
        let element = self.state.borrow().observation().element_for(section);
        match element {
            Some(element) => {
                self.scroller
                    .scroll_into_view(element, ScrollBehavior::Smooth);
                debug!(
                    "event=scroll_requested module=tracker status=ok section={}",
                    section
                );
                true
            }
            None => {
                trace!(
                    "event=scroll_requested module=tracker status=skipped reason=unregistered"
                );
                false
            }
        }
    }

    /// Subscribes to active-section changes.
    ///
    /// The listener runs once per batch that changed the active id.
    pub fn subscribe(&self, listener: impl Fn(&SectionId) + 'static) -> ListenerGuard {
        let key = self.state.borrow_mut().listeners.insert(Rc::new(listener));
        let weak = Rc::downgrade(&self.state);
        ListenerGuard::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.remove(key);
            }
        })
    }

    /// Releases every registration and the source subscription.
    ///
    /// Idempotent; also runs on drop.
    pub fn teardown(&self) {
        if observed::teardown(&self.state, self.source.as_ref()) {
            self.state.borrow_mut().listeners.clear();
            info!("event=tracker_teardown module=tracker status=ok");
        }
    }
}

impl Drop for SectionTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn apply_batch(state: &RefCell<TrackerState>, batch: &[VisibilityEntry]) {
    let (active, listeners) = {
        let mut state = state.borrow_mut();
        if !state.observation.is_live() {
            trace!("event=visibility_batch module=tracker status=skipped reason=torn_down");
            return;
        }

        let previous = state.active.clone();
        for entry in batch {
            if !entry.meets(state.threshold) {
                continue;
            }
            let Some(section) = state.observation.section_for(entry.element).cloned() else {
                trace!(
                    "event=visibility_entry module=tracker status=skipped element={}",
                    entry.element.raw()
                );
                continue;
            };
            state.active = section;
        }

        if state.active == previous {
            return;
        }
        debug!(
            "event=active_changed module=tracker status=ok from={} to={}",
            previous, state.active
        );
        (state.active.clone(), state.listeners.snapshot())
    };

    for listener in listeners {
        listener(&active);
    }
}
