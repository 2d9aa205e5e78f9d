//! Page state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Borrows must never be held across an `.await`; copy what you need out
//! with `with` and drop the borrow before suspending.

use cb_calculator_core::{Calculator, CalculatorConfig, Effect, Intent};
use cb_catalog_client::Catalog;
use cb_pricing::{OrderConfiguration, PriceBreakdown};
use std::cell::RefCell;

/// Central page state.
#[derive(Default)]
pub struct AppState {
    pub config: CalculatorConfig,
    pub calculator: Calculator,
    pub catalog: Catalog,
    /// Set while a save request is in flight.
    pub submitting: bool,
}

// ── Thread-local singleton ──

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn install(config: CalculatorConfig) {
    with_mut(|s| {
        s.calculator = Calculator::with_kind(config.pricing_policy);
        s.config = config;
    });
}

pub fn api_url() -> String {
    with(|s| s.config.api_url.clone())
}

pub fn dispatch(intent: Intent) -> Effect {
    with_mut(|s| s.calculator.dispatch(intent))
}

pub fn configuration() -> OrderConfiguration {
    with(|s| s.calculator.configuration().clone())
}

pub fn breakdown() -> PriceBreakdown {
    with(|s| s.calculator.breakdown())
}

pub fn catalog<F, R>(f: F) -> R
where
    F: FnOnce(&Catalog) -> R,
{
    with(|s| f(&s.catalog))
}

pub fn catalog_mut<F>(f: F)
where
    F: FnOnce(&mut Catalog),
{
    with_mut(|s| f(&mut s.catalog));
}

/// Marks a submission as started. Returns `false` if one is already running.
pub fn begin_submit() -> bool {
    with_mut(|s| !std::mem::replace(&mut s.submitting, true))
}

pub fn end_submit() {
    with_mut(|s| s.submitting = false);
}
