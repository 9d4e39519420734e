//! Browser console logging backend.
//!
//! # Responsibility
//! - Route `log` records from the core and the bridge to `console.*`.
//!
//! # Invariants
//! - The logger is installed at most once per page load.
//! - Re-initialization with the same level succeeds; a different level is
//!   rejected.

use log::{info, Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;
use portfolio_core::normalize_level;
use std::str::FromStr;
use wasm_bindgen::JsValue;

static LOGGER: ConsoleLogger = ConsoleLogger;
static CONSOLE_LEVEL: OnceCell<&'static str> = OnceCell::new();

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(record));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger at `level`.
///
/// # Errors
/// - Unsupported `level`.
/// - Another `log` backend is already installed.
/// - Console logging already active with another level.
pub fn init_console_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;
    let filter = level_filter(level)?;
    if let Some(active) = CONSOLE_LEVEL.get() {
        return check_level(active, level);
    }

    let active = CONSOLE_LEVEL.get_or_try_init(|| {
        log::set_logger(&LOGGER)
            .map_err(|err| format!("failed to install console logger: {err}"))?;
        log::set_max_level(filter);
        info!(
            "event=logging_init module=web status=ok level={} target=console version={}",
            level,
            env!("CARGO_PKG_VERSION")
        );
        Ok::<_, String>(level)
    })?;
    check_level(active, level)
}

/// Returns the active console level, if logging was initialized.
pub fn console_logging_level() -> Option<&'static str> {
    CONSOLE_LEVEL.get().copied()
}

fn level_filter(level: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(level).map_err(|err| format!("invalid log level `{level}`: {err}"))
}

fn check_level(active: &str, requested: &str) -> Result<(), String> {
    if active != requested {
        return Err(format!(
            "logging already initialized with level `{active}`; refusing to switch to `{requested}`"
        ));
    }
    Ok(())
}

fn format_record(record: &Record<'_>) -> String {
    format!(
        "{} [{}] {}",
        record.level(),
        record.module_path().unwrap_or("portfolio"),
        record.args()
    )
}

#[cfg(test)]
mod tests {
    use super::{check_level, format_record, level_filter};
    use log::{Level, LevelFilter, Record};

    #[test]
    fn level_filter_covers_every_supported_level() {
        assert_eq!(level_filter("trace"), Ok(LevelFilter::Trace));
        assert_eq!(level_filter("warn"), Ok(LevelFilter::Warn));
        assert_eq!(level_filter("off"), Ok(LevelFilter::Off));
        assert!(level_filter("verbose").is_err());
    }

    #[test]
    fn same_level_is_accepted_and_other_level_is_rejected() {
        assert!(check_level("info", "info").is_ok());
        let error = check_level("info", "debug").expect_err("switching level must fail");
        assert!(error.contains("refusing to switch to `debug`"));
    }

    #[test]
    fn record_line_carries_level_module_and_message() {
        let line = format_record(
            &Record::builder()
                .level(Level::Warn)
                .module_path(Some("portfolio_web::dom"))
                .args(format_args!("event=observe module=dom status=skipped"))
                .build(),
        );
        assert_eq!(
            line,
            "WARN [portfolio_web::dom] event=observe module=dom status=skipped"
        );
    }
}
