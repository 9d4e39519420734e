//! Headless viewport model.
//!
//! # Responsibility
//! - Compute section intersection ratios from a vertical layout.
//! - Emulate a viewport-intersection observer (`ManualViewport`) that delivers
//!   threshold-crossing batches synchronously on the calling thread.
//! - Record smooth-scroll requests and move the viewport accordingly.
//!
//! # Invariants
//! - A subscription only receives entries for elements it observes.
//! - Observing an element delivers one initial entry for it.
//! - After the initial entry, an element is reported only when it crosses
//!   the subscription threshold.
//! - Nested deliveries triggered from inside a handler are queued and run
//!   after the current handler returns.

use crate::tracker::source::{
    ElementHandle, ScrollBehavior, ScrollPort, SubscriptionId, VisibilityEntry, VisibilityHandler,
    VisibilitySource,
};
use log::trace;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

/// Vertical placement of one element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionLayout {
    pub element: ElementHandle,
    pub top: f64,
    pub height: f64,
}

impl SectionLayout {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Returns the visible fraction of `layout` for a viewport at `scroll_top`.
pub fn intersection_ratio(layout: &SectionLayout, scroll_top: f64, viewport_height: f64) -> f64 {
    if layout.height <= 0.0 || viewport_height <= 0.0 {
        return 0.0;
    }
    let visible_top = layout.top.max(scroll_top);
    let visible_bottom = layout.bottom().min(scroll_top + viewport_height);
    ((visible_bottom - visible_top).max(0.0) / layout.height).clamp(0.0, 1.0)
}

/// Lays elements out one after another starting at offset zero.
pub fn stack_layouts(heights: &[(ElementHandle, f64)]) -> Vec<SectionLayout> {
    let mut top = 0.0;
    heights
        .iter()
        .map(|&(element, height)| {
            let layout = SectionLayout {
                element,
                top,
                height,
            };
            top += height;
            layout
        })
        .collect()
}

/// One recorded scroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub element: ElementHandle,
    pub behavior: ScrollBehavior,
}

struct Subscription {
    threshold: f64,
    observed: Vec<ElementHandle>,
    reported: HashMap<ElementHandle, bool>,
}

struct ViewportState {
    viewport_height: f64,
    scroll_top: f64,
    layouts: BTreeMap<ElementHandle, SectionLayout>,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_subscription: u64,
    scroll_requests: Vec<ScrollRequest>,
}

impl ViewportState {
    fn ratio_of(&self, element: ElementHandle) -> f64 {
        self.layouts
            .get(&element)
            .map(|layout| intersection_ratio(layout, self.scroll_top, self.viewport_height))
            .unwrap_or(0.0)
    }

    fn document_height(&self) -> f64 {
        self.layouts
            .values()
            .map(SectionLayout::bottom)
            .fold(0.0, f64::max)
    }

    fn max_scroll_top(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    /// Collects crossing entries for every subscription.
    fn crossings(&mut self) -> Vec<(SubscriptionId, Vec<VisibilityEntry>)> {
        let ratios: HashMap<ElementHandle, f64> = self
            .layouts
            .keys()
            .map(|element| (*element, self.ratio_of(*element)))
            .collect();

        let mut batches = Vec::new();
        for (id, subscription) in self.subscriptions.iter_mut() {
            let mut entries = Vec::new();
            for element in &subscription.observed {
                let ratio = ratios.get(element).copied().unwrap_or(0.0);
                let entry = VisibilityEntry::with_ratio(*element, ratio);
                let above = entry.meets(subscription.threshold);
                if subscription.reported.get(element) != Some(&above) {
                    subscription.reported.insert(*element, above);
                    entries.push(entry);
                }
            }
            if !entries.is_empty() {
                batches.push((*id, entries));
            }
        }
        batches
    }
}

/// In-process visibility source and scroll port over a fixed layout.
pub struct ManualViewport {
    state: RefCell<ViewportState>,
    handlers: RefCell<BTreeMap<SubscriptionId, Rc<RefCell<VisibilityHandler>>>>,
    pending: RefCell<VecDeque<(SubscriptionId, Vec<VisibilityEntry>)>>,
    dispatching: Cell<bool>,
}

impl ManualViewport {
    /// Creates a viewport of `viewport_height` scrolled to the top.
    pub fn new(viewport_height: f64, layouts: Vec<SectionLayout>) -> Self {
        Self {
            state: RefCell::new(ViewportState {
                viewport_height: viewport_height.max(0.0),
                scroll_top: 0.0,
                layouts: layouts
                    .into_iter()
                    .map(|layout| (layout.element, layout))
                    .collect(),
                subscriptions: BTreeMap::new(),
                next_subscription: 1,
                scroll_requests: Vec::new(),
            }),
            handlers: RefCell::new(BTreeMap::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Creates a viewport whose elements are stacked with equal height.
    pub fn uniform(viewport_height: f64, elements: &[ElementHandle], section_height: f64) -> Self {
        let heights: Vec<(ElementHandle, f64)> = elements
            .iter()
            .map(|element| (*element, section_height))
            .collect();
        Self::new(viewport_height, stack_layouts(&heights))
    }

    pub fn scroll_top(&self) -> f64 {
        self.state.borrow().scroll_top
    }

    pub fn viewport_height(&self) -> f64 {
        self.state.borrow().viewport_height
    }

    pub fn layout_of(&self, element: ElementHandle) -> Option<SectionLayout> {
        self.state.borrow().layouts.get(&element).copied()
    }

    /// Returns the current intersection ratio of `element`.
    pub fn ratio_of(&self, element: ElementHandle) -> f64 {
        self.state.borrow().ratio_of(element)
    }

    pub fn scroll_requests(&self) -> Vec<ScrollRequest> {
        self.state.borrow().scroll_requests.clone()
    }

    pub fn subscription_count(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }

    /// Counts observations of `element` across all subscriptions.
    pub fn observer_count(&self, element: ElementHandle) -> usize {
        self.state
            .borrow()
            .subscriptions
            .values()
            .filter(|subscription| subscription.observed.contains(&element))
            .count()
    }

    /// Moves the viewport and delivers threshold crossings.
    ///
    /// The offset is clamped to the scrollable range.
    pub fn scroll_to(&self, offset: f64) {
        let batches = {
            let mut state = self.state.borrow_mut();
            let max = state.max_scroll_top();
            state.scroll_top = if offset.is_finite() {
                offset.clamp(0.0, max)
            } else {
                0.0
            };
            trace!(
                "event=viewport_scrolled module=viewport status=ok scroll_top={}",
                state.scroll_top
            );
            state.crossings()
        };
        self.enqueue(batches);
    }

    pub fn scroll_by(&self, delta: f64) {
        let current = self.scroll_top();
        self.scroll_to(current + delta);
    }

    /// Changes the viewport height and delivers threshold crossings.
    pub fn resize(&self, viewport_height: f64) {
        let batches = {
            let mut state = self.state.borrow_mut();
            state.viewport_height = viewport_height.max(0.0);
            let max = state.max_scroll_top();
            state.scroll_top = state.scroll_top.min(max);
            state.crossings()
        };
        self.enqueue(batches);
    }

    /// Delivers a scripted batch as-is, bypassing layout and crossing rules.
    ///
    /// Each subscription receives the entries for the elements it observes,
    /// in the given order.
    pub fn deliver(&self, batch: &[VisibilityEntry]) {
        let batches: Vec<(SubscriptionId, Vec<VisibilityEntry>)> = {
            let state = self.state.borrow();
            state
                .subscriptions
                .iter()
                .map(|(id, subscription)| {
                    let entries = batch
                        .iter()
                        .filter(|entry| subscription.observed.contains(&entry.element))
                        .copied()
                        .collect::<Vec<_>>();
                    (*id, entries)
                })
                .filter(|(_, entries)| !entries.is_empty())
                .collect()
        };
        self.enqueue(batches);
    }

    fn enqueue(&self, batches: Vec<(SubscriptionId, Vec<VisibilityEntry>)>) {
        if batches.is_empty() {
            return;
        }
        self.pending.borrow_mut().extend(batches);
        self.flush();
    }

    fn flush(&self) {
        if self.dispatching.replace(true) {
            return;
        }
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some((subscription, entries)) = next else {
                break;
            };
            let handler = self.handlers.borrow().get(&subscription).cloned();
            if let Some(handler) = handler {
                let mut handler = handler.borrow_mut();
                (*handler)(&entries);
            }
        }
        self.dispatching.set(false);
    }
}

impl VisibilitySource for ManualViewport {
    fn subscribe(&self, threshold: f64, handler: VisibilityHandler) -> SubscriptionId {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = SubscriptionId::new(state.next_subscription);
            state.next_subscription += 1;
            state.subscriptions.insert(
                id,
                Subscription {
                    threshold,
                    observed: Vec::new(),
                    reported: HashMap::new(),
                },
            );
            id
        };
        self.handlers
            .borrow_mut()
            .insert(id, Rc::new(RefCell::new(handler)));
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.state.borrow_mut().subscriptions.remove(&subscription);
        self.handlers.borrow_mut().remove(&subscription);
        self.pending
            .borrow_mut()
            .retain(|(pending, _)| *pending != subscription);
    }

    fn observe(&self, subscription: SubscriptionId, element: ElementHandle) {
        let initial = {
            let mut state = self.state.borrow_mut();
            let ratio = state.ratio_of(element);
            let Some(observer) = state.subscriptions.get_mut(&subscription) else {
                return;
            };
            if observer.observed.contains(&element) {
                return;
            }
            observer.observed.push(element);
            let initial = VisibilityEntry::with_ratio(element, ratio);
            observer
                .reported
                .insert(element, initial.meets(observer.threshold));
            initial
        };
        self.enqueue(vec![(subscription, vec![initial])]);
    }

    fn unobserve(&self, subscription: SubscriptionId, element: ElementHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(observer) = state.subscriptions.get_mut(&subscription) {
            observer.observed.retain(|observed| *observed != element);
            observer.reported.remove(&element);
        }
    }
}

impl ScrollPort for ManualViewport {
    fn scroll_into_view(&self, element: ElementHandle, behavior: ScrollBehavior) {
        let target = {
            let mut state = self.state.borrow_mut();
            state
                .scroll_requests
                .push(ScrollRequest { element, behavior });
            state.layouts.get(&element).map(|layout| layout.top)
        };
        if let Some(top) = target {
            self.scroll_to(top);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{intersection_ratio, stack_layouts, ManualViewport, SectionLayout};
    use crate::tracker::source::{ElementHandle, VisibilityEntry, VisibilitySource};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn element(raw: u32) -> ElementHandle {
        ElementHandle::new(raw)
    }

    fn recording_subscription(
        viewport: &ManualViewport,
        threshold: f64,
    ) -> (
        crate::tracker::source::SubscriptionId,
        Rc<RefCell<Vec<Vec<VisibilityEntry>>>>,
    ) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = viewport.subscribe(
            threshold,
            Box::new(move |batch: &[VisibilityEntry]| sink.borrow_mut().push(batch.to_vec())),
        );
        (id, seen)
    }

    #[test]
    fn ratio_covers_partial_full_and_disjoint_cases() {
        let layout = SectionLayout {
            element: element(1),
            top: 100.0,
            height: 200.0,
        };
        assert_eq!(intersection_ratio(&layout, 100.0, 800.0), 1.0);
        assert_eq!(intersection_ratio(&layout, 200.0, 800.0), 0.5);
        assert_eq!(intersection_ratio(&layout, 400.0, 800.0), 0.0);
        assert_eq!(intersection_ratio(&layout, 0.0, 0.0), 0.0);
    }

    #[test]
    fn stacked_layouts_are_contiguous() {
        let layouts = stack_layouts(&[(element(1), 100.0), (element(2), 250.0)]);
        assert_eq!(layouts[0].top, 0.0);
        assert_eq!(layouts[1].top, 100.0);
        assert_eq!(layouts[1].bottom(), 350.0);
    }

    #[test]
    fn observe_delivers_initial_entry() {
        let viewport = ManualViewport::uniform(100.0, &[element(1), element(2)], 100.0);
        let (id, seen) = recording_subscription(&viewport, 0.5);

        viewport.observe(id, element(1));
        viewport.observe(id, element(2));
        viewport.observe(id, element(2));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2, "duplicate observe must not deliver again");
        assert_eq!(seen[0], vec![VisibilityEntry::visible(element(1))]);
        assert_eq!(seen[1], vec![VisibilityEntry::hidden(element(2))]);
    }

    #[test]
    fn scrolling_reports_only_threshold_crossings() {
        let viewport = ManualViewport::uniform(100.0, &[element(1), element(2)], 100.0);
        let (id, seen) = recording_subscription(&viewport, 0.5);
        viewport.observe(id, element(1));
        viewport.observe(id, element(2));
        seen.borrow_mut().clear();

        viewport.scroll_to(30.0);
        assert!(seen.borrow().is_empty(), "no element crossed 0.5");

        viewport.scroll_to(60.0);
        let batches = seen.borrow().clone();
        assert_eq!(batches.len(), 1);
        let reported: Vec<u32> = batches[0].iter().map(|entry| entry.element.raw()).collect();
        assert_eq!(reported, vec![1, 2]);
        assert!(!batches[0][0].meets(0.5));
        assert!(batches[0][1].meets(0.5));
    }

    #[test]
    fn scroll_is_clamped_to_document() {
        let viewport = ManualViewport::uniform(100.0, &[element(1), element(2)], 100.0);
        viewport.scroll_to(10_000.0);
        assert_eq!(viewport.scroll_top(), 100.0);
        viewport.scroll_by(-500.0);
        assert_eq!(viewport.scroll_top(), 0.0);
    }

    #[test]
    fn deliver_filters_to_observed_elements() {
        let viewport = ManualViewport::uniform(100.0, &[element(1), element(2)], 100.0);
        let (id, seen) = recording_subscription(&viewport, 0.5);
        viewport.observe(id, element(1));
        seen.borrow_mut().clear();

        viewport.deliver(&[
            VisibilityEntry::visible(element(2)),
            VisibilityEntry::visible(element(1)),
        ]);
        assert_eq!(
            seen.borrow().clone(),
            vec![vec![VisibilityEntry::visible(element(1))]]
        );

        viewport.unobserve(id, element(1));
        viewport.deliver(&[VisibilityEntry::visible(element(1))]);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(viewport.observer_count(element(1)), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let viewport = ManualViewport::uniform(100.0, &[element(1)], 100.0);
        let (id, seen) = recording_subscription(&viewport, 0.5);
        viewport.observe(id, element(1));
        viewport.unsubscribe(id);
        viewport.deliver(&[VisibilityEntry::visible(element(1))]);

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(viewport.subscription_count(), 0);
    }

    #[test]
    fn nested_delivery_is_queued_not_reentered() {
        let viewport = Rc::new(ManualViewport::uniform(
            100.0,
            &[element(1), element(2)],
            100.0,
        ));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let weak = Rc::downgrade(&viewport);
        let id = viewport.subscribe(
            0.5,
            Box::new(move |batch: &[VisibilityEntry]| {
                sink.borrow_mut().push(batch.len());
                if sink.borrow().len() == 1 {
                    if let Some(viewport) = weak.upgrade() {
                        viewport.scroll_to(100.0);
                    }
                }
            }),
        );
        viewport.observe(id, element(1));

        assert_eq!(
            seen.borrow().clone(),
            vec![1, 1],
            "nested scroll batch runs after the initial entry"
        );
        assert_eq!(viewport.scroll_top(), 100.0);
    }
}
