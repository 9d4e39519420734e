//! Browser-facing entry points.
//!
//! # Responsibility
//! - Render the portfolio into the document body and mount its trackers.
//! - Keep nav highlighting and reveal classes in sync with tracker state.
//! - Release observers, listeners and click handlers on unmount.
//! - Install the console log backend on request.
//!
//! # Invariants
//! - At most one page is mounted per thread.
//! - Exported functions never panic; failures surface as `JsValue` errors.

use crate::dom::{warn_on_err, DomElements, DomScroller, DomVisibilitySource};
use crate::logging::init_console_logging;
use log::{error, info, warn};
use portfolio_core::render::{NAV_ACTIVE_CLASS, NAV_IDLE_CLASS, NAV_SECTION_ATTR, REVEALED_CLASS};
use portfolio_core::{
    core_version as core_version_inner, render_body, stylesheet, ListenerGuard, PortfolioConfig,
    PortfolioView, ScrollPort, SectionId, ViewState, VisibilitySource,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event};

thread_local! {
    static MOUNTED: RefCell<Option<MountedPage>> = const { RefCell::new(None) };
}

struct MountedPage {
    listeners: Vec<ListenerGuard>,
    clicks: Vec<NavClick>,
    view: PortfolioView,
    elements: DomElements,
}

struct NavClick {
    button: Element,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for NavClick {
    fn drop(&mut self) {
        warn_on_err(
            "nav_click_remove",
            self.button
                .remove_event_listener_with_callback("click", self.callback.as_ref().unchecked_ref()),
        );
    }
}

/// Mounts the built-in portfolio when the module loads.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    mount_config(PortfolioConfig::default_portfolio())
}

/// Replaces the mounted page with one built from a JSON config.
///
/// # FFI contract
/// - Rejects configs that fail validation without touching the current page.
/// - Any previously mounted page is unmounted first.
#[wasm_bindgen]
pub fn mount_json(config_json: &str) -> Result<(), JsValue> {
    let config = PortfolioConfig::from_json_str(config_json)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    mount_config(config)
}

/// Tears the mounted page down. Returns `false` when nothing was mounted.
#[wasm_bindgen]
pub fn unmount() -> bool {
    let Some(page) = MOUNTED.with(|slot| slot.borrow_mut().take()) else {
        return false;
    };
    let MountedPage {
        listeners,
        clicks,
        view,
        elements,
    } = page;
    drop(listeners);
    drop(clicks);
    view.unmount();
    elements.clear();
    true
}

/// Smooth-scrolls to a section. Unknown ids are ignored.
#[wasm_bindgen]
pub fn scroll_to_section(section: &str) -> bool {
    MOUNTED.with(|slot| {
        slot.try_borrow()
            .ok()
            .and_then(|page| page.as_ref().map(|page| page.view.scroll_to_section(section)))
            .unwrap_or(false)
    })
}

/// Returns the active section id, if a page is mounted.
#[wasm_bindgen]
pub fn active_section() -> Option<String> {
    MOUNTED.with(|slot| {
        slot.try_borrow()
            .ok()
            .and_then(|page| page.as_ref().map(|page| page.view.active().to_string()))
    })
}

/// Routes core and bridge logs to the browser console.
///
/// # FFI contract
/// - Returns an empty string on success, the error message otherwise.
/// - Repeating the call with the same level is a no-op.
/// - Never throws.
#[wasm_bindgen]
pub fn init_logging(level: String) -> String {
    match init_console_logging(level.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

#[wasm_bindgen]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

fn mount_config(config: PortfolioConfig) -> Result<(), JsValue> {
    unmount();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("document is unavailable"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let initial = ViewState::initial(&config)
        .ok_or_else(|| JsValue::from_str("config must declare at least one section"))?;
    body.set_inner_html(&format!(
        "<style>\n{}</style>\n{}",
        stylesheet(),
        render_body(&config, &initial)
    ));

    let (sections, nav) = collect_nodes(&document, &config)?;
    let elements = DomElements::new();
    let dom_source = Rc::new(DomVisibilitySource::new(elements.clone()));
    let source: Rc<dyn VisibilitySource> = dom_source.clone();
    let scroller: Rc<dyn ScrollPort> = Rc::new(DomScroller::new(elements.clone()));

    let view = PortfolioView::mount(config, source, scroller, |section| {
        let (_, node) = sections.iter().find(|(id, _)| *id == section.id)?;
        elements
            .adopt(node)
            .map_err(|err| {
                warn!(
                    "event=element_adopt module=api status=error section={} error={err:?}",
                    section.id
                )
            })
            .ok()
    })
    .map_err(|err| JsValue::from_str(&err.to_string()))?;

    let observers = dom_source.observer_count();
    if observers < PortfolioView::TRACKER_COUNT {
        error!(
            "event=page_mounted module=api status=error observers={} expected={}",
            observers,
            PortfolioView::TRACKER_COUNT
        );
        view.unmount();
        elements.clear();
        return Err(JsValue::from_str(
            "IntersectionObserver is unavailable; section tracking cannot start",
        ));
    }

    let nav = Rc::new(nav);
    let sections = Rc::new(sections);
    let active_nav = Rc::clone(&nav);
    let reveal_nodes = Rc::clone(&sections);
    let listeners = vec![
        view.on_active_change(move |active| apply_active(&active_nav, active)),
        view.on_reveal_change(move |section, revealed| {
            apply_reveal(&reveal_nodes, section, revealed)
        }),
    ];

    let mut clicks = Vec::with_capacity(nav.len());
    for (id, button) in nav.iter() {
        let target = id.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            scroll_to_section(target.as_str());
        });
        button.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
        clicks.push(NavClick {
            button: button.clone(),
            callback,
        });
    }

    info!(
        "event=page_mounted module=api status=ok sections={} nav={}",
        sections.len(),
        clicks.len()
    );
    MOUNTED.with(|slot| {
        *slot.borrow_mut() = Some(MountedPage {
            listeners,
            clicks,
            view,
            elements,
        });
    });
    Ok(())
}

type SectionNodes = Vec<(SectionId, Element)>;

fn collect_nodes(
    document: &Document,
    config: &PortfolioConfig,
) -> Result<(SectionNodes, SectionNodes), JsValue> {
    let mut sections = Vec::with_capacity(config.sections.len());
    let mut nav = Vec::with_capacity(config.sections.len());
    for section in &config.sections {
        if let Some(node) = document.get_element_by_id(section.id.as_str()) {
            sections.push((section.id.clone(), node));
        }
        let selector = format!("[{NAV_SECTION_ATTR}=\"{}\"]", section.id);
        if let Some(button) = document.query_selector(&selector)? {
            nav.push((section.id.clone(), button));
        }
    }
    Ok((sections, nav))
}

fn apply_active(nav: &[(SectionId, Element)], active: &SectionId) {
    for (id, button) in nav {
        let is_active = id == active;
        let classes = button.class_list();
        warn_on_err("nav_class", classes.toggle_with_force(NAV_ACTIVE_CLASS, is_active));
        warn_on_err("nav_class", classes.toggle_with_force(NAV_IDLE_CLASS, !is_active));
        let current = if is_active {
            button.set_attribute("aria-current", "true")
        } else {
            button.remove_attribute("aria-current")
        };
        warn_on_err("nav_aria_current", current);
    }
}

fn apply_reveal(sections: &[(SectionId, Element)], section: &SectionId, revealed: bool) {
    if let Some((_, node)) = sections.iter().find(|(id, _)| id == section) {
        warn_on_err(
            "reveal_class",
            node.class_list().toggle_with_force(REVEALED_CLASS, revealed),
        );
    }
}
