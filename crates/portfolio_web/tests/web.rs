#![cfg(target_arch = "wasm32")]

use portfolio_core::PortfolioConfig;
use portfolio_web::api::{active_section, init_logging, mount_json, scroll_to_section, unmount};
use portfolio_web::console_logging_level;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn default_json() -> String {
    PortfolioConfig::default_portfolio()
        .to_json_pretty()
        .expect("default config serializes")
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected_without_mounting() {
    unmount();
    assert!(mount_json("{ \"sections\": [] }").is_err());
    assert_eq!(active_section(), None);
    assert!(!scroll_to_section("home"));
}

#[wasm_bindgen_test]
fn mount_then_unmount_releases_the_page() {
    mount_json(&default_json()).expect("default config mounts");
    assert_eq!(active_section().as_deref(), Some("home"));
    assert!(!scroll_to_section("blog"));

    assert!(unmount());
    assert!(!unmount(), "second unmount finds nothing");
    assert_eq!(active_section(), None);
}

#[wasm_bindgen_test]
fn init_logging_is_idempotent_and_rejects_a_new_level() {
    assert_eq!(init_logging("debug".to_string()), "");
    assert_eq!(init_logging("DEBUG".to_string()), "");
    assert_eq!(console_logging_level(), Some("debug"));
    assert!(init_logging("info".to_string()).contains("refusing to switch"));
    assert!(init_logging("verbose".to_string()).contains("unsupported log level"));
}
