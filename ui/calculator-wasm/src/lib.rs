//! Crumbear cake calculator, browser front end.
//!
//! DOM events become calculator intents; every intent reprices the order
//! and redraws the breakdown. Each concern lives in its own module.

pub mod api;
pub mod catalog;
pub mod dom;
pub mod events;
pub mod notify;
pub mod render;
pub mod state;
pub mod submit;

use cb_calculator_core::CalculatorConfig;
use wasm_bindgen::prelude::*;

/// WASM entry point, called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init()
}

fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    // `data-api-url` / `data-pricing-policy` on the calculator root.
    let config =
        CalculatorConfig::from_lookup(|key| dom::data_attr(&els.root, &key.replace('_', "-")))
            .unwrap_or_else(|err| {
                gloo_console::warn!(format!("{err}; falling back to defaults"));
                CalculatorConfig::default()
            });
    gloo_console::log!(format!(
        "crumbear calculator: policy={} api={}",
        config.pricing_policy,
        if config.api_url.is_empty() { "same-origin" } else { config.api_url.as_str() }
    ));
    state::install(config);

    events::bind_events(&els)?;
    render::render_all(&els);
    catalog::load_all(&els);

    Ok(())
}
