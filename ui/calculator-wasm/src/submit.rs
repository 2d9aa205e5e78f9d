//! Estimate submission.
//!
//! Validation failures and backend failures each get their own danger
//! banner; only a confirmed save shows success. The save button stays
//! disabled while a request is in flight.

use cb_api_types::EstimateRequest;
use cb_calculator_core::{SubmitOutcome, ValidationError, send_estimate};

use crate::api::FetchBackend;
use crate::dom::Elements;
use crate::notify::{self, Level};
use crate::state;

pub fn send(els: &Elements, prepared: Result<EstimateRequest, ValidationError>) {
    if let Err(reason) = &prepared {
        notify::show(els, &reason.to_string(), Level::Danger);
        return;
    }
    if !state::begin_submit() {
        return;
    }
    let _ = els.save_btn.set_attribute("disabled", "");

    let els = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let backend = FetchBackend::new(state::api_url());
        let outcome = send_estimate(&backend, prepared).await;

        state::end_submit();
        let _ = els.save_btn.remove_attribute("disabled");

        match outcome {
            SubmitOutcome::Saved(receipt) => {
                let message = match receipt.estimate_id {
                    Some(id) => format!("Price estimate #{id} saved successfully!"),
                    None => "Price estimate saved successfully!".to_owned(),
                };
                notify::show(&els, &message, Level::Success);
            }
            SubmitOutcome::Rejected(reason) => {
                notify::show(&els, &reason.to_string(), Level::Danger);
            }
            SubmitOutcome::Failed(err) => {
                gloo_console::warn!(format!("estimate save failed: {err}"));
                notify::show(
                    &els,
                    "Could not save your estimate. Please try again.",
                    Level::Danger,
                );
            }
        }
    });
}
