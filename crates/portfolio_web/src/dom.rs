//! DOM-backed tracker collaborators.
//!
//! # Responsibility
//! - Feed `IntersectionObserver` entries into the core trackers.
//! - Perform smooth scrolling with `Element.scrollIntoView`.
//!
//! # Invariants
//! - Every observed element carries its handle in `HANDLE_ATTR`.
//! - Entries whose target has no handle are dropped.

use js_sys::Array;
use log::{error, trace, warn};
use portfolio_core::{
    ElementHandle, ScrollBehavior, ScrollPort, SubscriptionId, VisibilityEntry, VisibilityHandler,
    VisibilitySource,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    ScrollIntoViewOptions, ScrollLogicalPosition,
};

/// Attribute holding the element handle on observed nodes.
pub const HANDLE_ATTR: &str = "data-portfolio-handle";

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Handle table shared by the visibility source and the scroller.
#[derive(Clone, Default)]
pub struct DomElements {
    inner: Rc<RefCell<ElementTable>>,
}

#[derive(Default)]
struct ElementTable {
    next: u32,
    by_handle: HashMap<ElementHandle, Element>,
}

impl DomElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a handle to `element`, reusing the one it already carries.
    pub fn adopt(&self, element: &Element) -> Result<ElementHandle, JsValue> {
        if let Some(handle) = handle_of(element) {
            let mut table = self.inner.borrow_mut();
            table.by_handle.insert(handle, element.clone());
            table.next = table.next.max(handle.raw().saturating_add(1));
            return Ok(handle);
        }

        let mut table = self.inner.borrow_mut();
        let handle = ElementHandle::new(table.next);
        element.set_attribute(HANDLE_ATTR, &handle.raw().to_string())?;
        table.next = table.next.saturating_add(1);
        table.by_handle.insert(handle, element.clone());
        Ok(handle)
    }

    pub fn get(&self, handle: ElementHandle) -> Option<Element> {
        self.inner.borrow().by_handle.get(&handle).cloned()
    }

    pub fn clear(&self) {
        let drained: Vec<Element> = self
            .inner
            .borrow_mut()
            .by_handle
            .drain()
            .map(|(_, element)| element)
            .collect();
        for element in drained {
            warn_on_err("handle_clear", element.remove_attribute(HANDLE_ATTR));
        }
    }
}

/// Logs a failed DOM call; callers have no better recovery than carrying on.
pub(crate) fn warn_on_err<T>(event: &str, result: Result<T, JsValue>) {
    if let Err(err) = result {
        warn!("event={event} module=dom status=error error={err:?}");
    }
}

fn handle_of(element: &Element) -> Option<ElementHandle> {
    element
        .get_attribute(HANDLE_ATTR)
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(ElementHandle::new)
}

struct DomObserver {
    observer: IntersectionObserver,
    // Kept alive for as long as the observer may call it.
    _callback: ObserverCallback,
}

/// `VisibilitySource` backed by one `IntersectionObserver` per subscription.
pub struct DomVisibilitySource {
    elements: DomElements,
    next_subscription: Cell<u64>,
    observers: RefCell<HashMap<SubscriptionId, DomObserver>>,
}

impl DomVisibilitySource {
    pub fn new(elements: DomElements) -> Self {
        Self {
            elements,
            next_subscription: Cell::new(0),
            observers: RefCell::new(HashMap::new()),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    fn create_observer(
        threshold: f64,
        mut handler: VisibilityHandler,
    ) -> Result<DomObserver, JsValue> {
        let callback: ObserverCallback = Closure::new(move |entries: Array, _: IntersectionObserver| {
            let batch: Vec<VisibilityEntry> = entries
                .iter()
                .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let element = handle_of(&entry.target())?;
                    Some(VisibilityEntry {
                        element,
                        is_intersecting: entry.is_intersecting(),
                        intersection_ratio: entry.intersection_ratio(),
                    })
                })
                .collect();
            trace!(
                "event=observer_batch module=dom status=ok entries={}",
                batch.len()
            );
            if !batch.is_empty() {
                handler(&batch);
            }
        });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        Ok(DomObserver {
            observer,
            _callback: callback,
        })
    }
}

impl VisibilitySource for DomVisibilitySource {
    fn subscribe(&self, threshold: f64, handler: VisibilityHandler) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_subscription.get());
        self.next_subscription.set(id.raw() + 1);

        match Self::create_observer(threshold, handler) {
            Ok(observer) => {
                self.observers.borrow_mut().insert(id, observer);
            }
            Err(err) => error!(
                "event=observer_create module=dom status=error threshold={threshold} error={err:?}"
            ),
        }
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        let removed = self.observers.borrow_mut().remove(&subscription);
        if let Some(entry) = removed {
            entry.observer.disconnect();
        }
    }

    fn observe(&self, subscription: SubscriptionId, element: ElementHandle) {
        let Some(node) = self.elements.get(element) else {
            warn!(
                "event=observe module=dom status=skipped element={}",
                element.raw()
            );
            return;
        };
        if let Some(entry) = self.observers.borrow().get(&subscription) {
            entry.observer.observe(&node);
        }
    }

    fn unobserve(&self, subscription: SubscriptionId, element: ElementHandle) {
        let Some(node) = self.elements.get(element) else {
            return;
        };
        if let Some(entry) = self.observers.borrow().get(&subscription) {
            entry.observer.unobserve(&node);
        }
    }
}

/// `ScrollPort` that aligns the element's top with the viewport top.
pub struct DomScroller {
    elements: DomElements,
}

impl DomScroller {
    pub fn new(elements: DomElements) -> Self {
        Self { elements }
    }
}

impl ScrollPort for DomScroller {
    fn scroll_into_view(&self, element: ElementHandle, behavior: ScrollBehavior) {
        let Some(node) = self.elements.get(element) else {
            warn!(
                "event=scroll_into_view module=dom status=skipped element={}",
                element.raw()
            );
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
