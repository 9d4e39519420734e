//! Browser bridge for the portfolio page.
//!
//! `dom` adapts the DOM to the core tracker traits, `logging` routes `log`
//! records to the console and `api` exports the wasm entry points.

pub mod api;
pub mod dom;
pub mod logging;

pub use dom::{DomElements, DomScroller, DomVisibilitySource, HANDLE_ATTR};
pub use logging::{console_logging_level, init_console_logging};
