//! Platform collaborator contracts consumed by the trackers.
//!
//! # Responsibility
//! - Describe the viewport-intersection notification service as an explicit
//!   subscribe/observe interface.
//! - Describe the smooth-scroll primitive.
//!
//! # Invariants
//! - Implementations deliver batches on the calling thread; nothing here is
//!   `Send`.
//! - A batch only reaches the handler of the subscription that observes the
//!   reported elements.

/// Opaque handle of one rendered element known to a visibility source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementHandle(u32);

impl ElementHandle {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Handle returned by `VisibilitySource::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One element's visibility as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    pub element: ElementHandle,
    /// Whether any part of the element is inside the viewport.
    pub is_intersecting: bool,
    /// Visible fraction of the element area, in `[0, 1]`.
    pub intersection_ratio: f64,
}

impl VisibilityEntry {
    /// Builds an entry from a ratio; any positive ratio counts as intersecting.
    pub fn with_ratio(element: ElementHandle, ratio: f64) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self {
            element,
            is_intersecting: ratio > 0.0,
            intersection_ratio: ratio,
        }
    }

    /// Builds an entry for an element fully inside the viewport.
    pub fn visible(element: ElementHandle) -> Self {
        Self::with_ratio(element, 1.0)
    }

    /// Builds an entry for an element fully outside the viewport.
    pub fn hidden(element: ElementHandle) -> Self {
        Self::with_ratio(element, 0.0)
    }

    /// Returns whether this entry qualifies against `threshold`.
    pub fn meets(&self, threshold: f64) -> bool {
        self.is_intersecting && self.intersection_ratio >= threshold
    }
}

/// Callback receiving one notification batch in delivery order.
pub type VisibilityHandler = Box<dyn FnMut(&[VisibilityEntry])>;

/// Viewport-intersection notification service.
pub trait VisibilitySource {
    /// Registers a handler notified whenever an observed element crosses
    /// `threshold`.
    fn subscribe(&self, threshold: f64, handler: VisibilityHandler) -> SubscriptionId;

    /// Drops the handler and every observation made through `subscription`.
    fn unsubscribe(&self, subscription: SubscriptionId);

    fn observe(&self, subscription: SubscriptionId, element: ElementHandle);

    fn unobserve(&self, subscription: SubscriptionId, element: ElementHandle);
}

/// Scroll animation style requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Scroll primitive aligning an element's top with the viewport top.
pub trait ScrollPort {
    fn scroll_into_view(&self, element: ElementHandle, behavior: ScrollBehavior);
}

#[cfg(test)]
mod tests {
    use super::{ElementHandle, VisibilityEntry};

    #[test]
    fn with_ratio_clamps_and_derives_intersecting() {
        let element = ElementHandle::new(1);
        let entry = VisibilityEntry::with_ratio(element, 1.4);
        assert_eq!(entry.intersection_ratio, 1.0);
        assert!(entry.is_intersecting);

        let hidden = VisibilityEntry::with_ratio(element, -0.2);
        assert_eq!(hidden.intersection_ratio, 0.0);
        assert!(!hidden.is_intersecting);
    }

    #[test]
    fn meets_requires_intersection_and_ratio() {
        let element = ElementHandle::new(2);
        assert!(VisibilityEntry::with_ratio(element, 0.5).meets(0.5));
        assert!(!VisibilityEntry::with_ratio(element, 0.49).meets(0.5));

        let mut stale = VisibilityEntry::visible(element);
        stale.is_intersecting = false;
        assert!(!stale.meets(0.5));
    }
}
