//! Shared observation bookkeeping and scoped guards for the trackers.

use crate::model::section::SectionId;
use crate::tracker::source::{ElementHandle, SubscriptionId, VisibilitySource};
use crate::tracker::TrackerError;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

/// Section/element association plus the source subscription it lives under.
pub(crate) struct Observation {
    sections: Vec<SectionId>,
    by_section: BTreeMap<SectionId, Binding>,
    by_element: HashMap<ElementHandle, SectionId>,
    subscription: Option<SubscriptionId>,
    next_generation: u64,
}

/// One live association; `generation` is unique per `attach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) element: ElementHandle,
    pub(crate) generation: u64,
}

impl Observation {
    pub(crate) fn new(sections: Vec<SectionId>) -> Self {
        Self {
            sections,
            by_section: BTreeMap::new(),
            by_element: HashMap::new(),
            subscription: None,
            next_generation: 0,
        }
    }

    pub(crate) fn bind(&mut self, subscription: SubscriptionId) {
        self.subscription = Some(subscription);
    }

    pub(crate) fn is_live(&self) -> bool {
        self.subscription.is_some()
    }

    pub(crate) fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    pub(crate) fn section_for(&self, element: ElementHandle) -> Option<&SectionId> {
        self.by_element.get(&element)
    }

    pub(crate) fn element_for(&self, section: &str) -> Option<ElementHandle> {
        self.binding_for(section).map(|binding| binding.element)
    }

    pub(crate) fn binding_for(&self, section: &str) -> Option<Binding> {
        self.by_section.get(section).copied()
    }

    pub(crate) fn registered_count(&self) -> usize {
        self.by_section.len()
    }

    /// Records an association and returns the subscription to observe under.
    pub(crate) fn attach(
        &mut self,
        section: &str,
        element: ElementHandle,
    ) -> Result<(SectionId, SubscriptionId, Binding), TrackerError> {
        let subscription = self.subscription.ok_or(TrackerError::TornDown)?;
        let Some(id) = self.sections.iter().find(|id| id.as_str() == section).cloned() else {
            return Err(TrackerError::UnknownSection(section.to_string()));
        };
        if self.by_section.contains_key(&id) {
            return Err(TrackerError::AlreadyRegistered(id));
        }
        if let Some(owner) = self.by_element.get(&element) {
            return Err(TrackerError::ElementInUse {
                element: element.raw(),
                section: owner.clone(),
            });
        }

        let binding = Binding {
            element,
            generation: self.next_generation,
        };
        self.next_generation += 1;
        self.by_section.insert(id.clone(), binding);
        self.by_element.insert(element, id.clone());
        Ok((id, subscription, binding))
    }

    /// Removes an association only if it is still the one `binding` created.
    pub(crate) fn detach(
        &mut self,
        section: &SectionId,
        binding: Binding,
    ) -> Option<SubscriptionId> {
        if self.by_section.get(section) != Some(&binding) {
            return None;
        }
        self.by_section.remove(section);
        self.by_element.remove(&binding.element);
        self.subscription
    }

    /// Clears every association and hands back what the source must release.
    pub(crate) fn teardown(&mut self) -> Option<(SubscriptionId, Vec<ElementHandle>)> {
        let subscription = self.subscription.take()?;
        let elements = self
            .by_section
            .values()
            .map(|binding| binding.element)
            .collect();
        self.by_section.clear();
        self.by_element.clear();
        Some((subscription, elements))
    }
}

/// Tracker state that embeds an `Observation`.
pub(crate) trait Observed {
    fn observation(&self) -> &Observation;

    fn observation_mut(&mut self) -> &mut Observation;

    /// Hook run after `section` stopped being observed.
    ///
    /// The returned callback runs once the state borrow is released.
    fn released(&mut self, _section: &SectionId) -> Option<Deferred> {
        None
    }
}

/// Work deferred until no state borrow is held.
pub(crate) type Deferred = Box<dyn FnOnce()>;

/// Registers `section` on the tracker state and starts observing `element`.
pub(crate) fn register<S: Observed + 'static>(
    state: &Rc<RefCell<S>>,
    source: &Rc<dyn VisibilitySource>,
    section: &str,
    element: ElementHandle,
) -> Result<SectionRegistration, TrackerError> {
    let (id, subscription, binding) =
        state.borrow_mut().observation_mut().attach(section, element)?;
    source.observe(subscription, element);

    let weak: Weak<RefCell<S>> = Rc::downgrade(state);
    let release_source = Rc::clone(source);
    let release_id = id.clone();
    Ok(SectionRegistration {
        section: id,
        element,
        release: Some(Box::new(move || {
            if let Some(state) = weak.upgrade() {
                release(&state, release_source.as_ref(), &release_id, binding);
            }
        })),
    })
}

/// Stops observing `section` if `binding` is still its live association.
pub(crate) fn release<S: Observed>(
    state: &RefCell<S>,
    source: &dyn VisibilitySource,
    section: &SectionId,
    binding: Binding,
) -> bool {
    let (subscription, deferred) = {
        let mut state = state.borrow_mut();
        let Some(subscription) = state.observation_mut().detach(section, binding) else {
            return false;
        };
        (subscription, state.released(section))
    };
    source.unobserve(subscription, binding.element);
    if let Some(deferred) = deferred {
        deferred();
    }
    true
}

/// Unobserves every element and drops the source subscription.
pub(crate) fn teardown<S: Observed>(state: &RefCell<S>, source: &dyn VisibilitySource) -> bool {
    let Some((subscription, elements)) = state.borrow_mut().observation_mut().teardown() else {
        return false;
    };
    for element in elements {
        source.unobserve(subscription, element);
    }
    source.unsubscribe(subscription);
    true
}

/// Scoped observation of one section element.
///
/// Dropping the guard unobserves the element. Releasing after the tracker was
/// torn down is a no-op.
#[must_use = "dropping the registration stops observing the section"]
pub struct SectionRegistration {
    section: SectionId,
    element: ElementHandle,
    release: Option<Box<dyn FnOnce()>>,
}

impl SectionRegistration {
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// Releases the registration now.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for SectionRegistration {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl Debug for SectionRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRegistration")
            .field("section", &self.section)
            .field("element", &self.element)
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Ordered listener storage with stable removal keys.
pub(crate) struct ListenerSet<F: ?Sized> {
    next_key: u64,
    entries: Vec<(u64, Rc<F>)>,
}

impl<F: ?Sized> ListenerSet<F> {
    pub(crate) fn new() -> Self {
        Self {
            next_key: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, listener: Rc<F>) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        self.entries.push((key, listener));
        key
    }

    pub(crate) fn remove(&mut self, key: u64) {
        self.entries.retain(|(entry_key, _)| *entry_key != key);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Clones the current listeners so they can run without a state borrow.
    pub(crate) fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

/// Scoped change subscription; dropping it removes the listener.
#[must_use = "dropping the guard unsubscribes the listener"]
pub struct ListenerGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub(crate) fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Removes the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Debug for ListenerGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, ListenerSet, Observation};
    use crate::model::section::SectionId;
    use crate::tracker::source::{ElementHandle, SubscriptionId};
    use crate::tracker::TrackerError;
    use std::rc::Rc;

    fn ids(values: &[&str]) -> Vec<SectionId> {
        values
            .iter()
            .map(|value| SectionId::parse(value).expect("valid id"))
            .collect()
    }

    #[test]
    fn attach_requires_live_subscription() {
        let mut observation = Observation::new(ids(&["home"]));
        let err = observation
            .attach("home", ElementHandle::new(1))
            .expect_err("unbound observation must reject");
        assert_eq!(err, TrackerError::TornDown);
    }

    #[test]
    fn attach_and_detach_keep_both_indexes_in_sync() {
        let mut observation = Observation::new(ids(&["home", "about"]));
        observation.bind(SubscriptionId::new(7));

        let element = ElementHandle::new(3);
        let (_, _, binding) = observation.attach("about", element).expect("attach about");
        assert_eq!(observation.element_for("about"), Some(element));
        assert_eq!(
            observation.section_for(element).map(SectionId::as_str),
            Some("about")
        );

        let about = SectionId::parse("about").expect("valid id");
        let other_element = Binding {
            element: ElementHandle::new(4),
            ..binding
        };
        assert_eq!(
            observation.detach(&about, other_element),
            None,
            "stale element must not detach"
        );
        assert_eq!(
            observation.detach(&about, binding),
            Some(SubscriptionId::new(7))
        );
        assert_eq!(observation.registered_count(), 0);
        assert_eq!(observation.section_for(element), None);
    }

    #[test]
    fn detach_ignores_bindings_from_an_earlier_attach() {
        let mut observation = Observation::new(ids(&["projects"]));
        observation.bind(SubscriptionId::new(2));
        let element = ElementHandle::new(4);
        let projects = SectionId::parse("projects").expect("valid id");

        let (_, _, first) = observation.attach("projects", element).expect("first attach");
        observation.detach(&projects, first).expect("first detach");
        let (_, _, second) = observation.attach("projects", element).expect("second attach");

        assert_ne!(first.generation, second.generation);
        assert_eq!(observation.detach(&projects, first), None);
        assert_eq!(observation.binding_for("projects"), Some(second));
    }

    #[test]
    fn teardown_returns_elements_once() {
        let mut observation = Observation::new(ids(&["home", "about"]));
        observation.bind(SubscriptionId::new(1));
        observation
            .attach("home", ElementHandle::new(1))
            .expect("attach home");
        observation
            .attach("about", ElementHandle::new(2))
            .expect("attach about");

        let (subscription, mut elements) = observation.teardown().expect("first teardown");
        elements.sort();
        assert_eq!(subscription, SubscriptionId::new(1));
        assert_eq!(elements, vec![ElementHandle::new(1), ElementHandle::new(2)]);
        assert!(observation.teardown().is_none());
        assert!(!observation.is_live());
    }

    #[test]
    fn listener_set_removes_by_key() {
        let mut set: ListenerSet<dyn Fn() -> u8> = ListenerSet::new();
        let first = set.insert(Rc::new(|| 1u8));
        set.insert(Rc::new(|| 2u8));
        set.remove(first);

        let values: Vec<u8> = set.snapshot().iter().map(|listener| listener()).collect();
        assert_eq!(values, vec![2]);
        assert_eq!(set.len(), 1);
    }
}
