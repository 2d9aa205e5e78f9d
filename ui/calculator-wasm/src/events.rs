//! Event binding.
//!
//! Every handler translates a DOM event into an [`Intent`] and hands it to
//! [`render::apply`]. Catalog-driven controls (size cards, topping rows)
//! are bound by `catalog.rs` when they are created.

use cb_api_types::{IcingPart, ShadeTier};
use cb_calculator_core::Intent;
use cb_pricing::{FlavorSelection, MAX_LAYERS, MIN_LAYERS};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, HtmlInputElement, HtmlSelectElement};

use crate::dom::{self, Elements};
use crate::render;
use crate::state;

/// Attaches a handler and leaks the closure for the lifetime of the page.
macro_rules! listen {
    ($target:expr, $event:expr, $handler:expr) => {{
        let cb = Closure::wrap(Box::new($handler) as Box<dyn FnMut(web_sys::Event)>);
        $target.add_event_listener_with_callback($event, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

pub(crate) use listen;

/// The element the listener is attached to, cast to `T`.
pub fn current<T: JsCast>(event: &web_sys::Event) -> Option<T> {
    event
        .current_target()
        .and_then(|target: EventTarget| target.dyn_into::<T>().ok())
}

/// Bind all static UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) -> Result<(), JsValue> {
    // ── Base cake ──
    {
        let els2 = els.clone();
        listen!(els.base_cake_select, "change", move |e: web_sys::Event| {
            let Some(select) = current::<HtmlSelectElement>(&e) else {
                return;
            };
            let cake_id = select.value().trim().parse::<u32>().ok();
            render::apply(&els2, Intent::SelectBaseCake(cake_id));
        });
    }

    // ── Layers ──
    els.layer_slider.set_min(&MIN_LAYERS.to_string());
    els.layer_slider.set_max(&MAX_LAYERS.to_string());
    els.layer_slider.set_value(&MIN_LAYERS.to_string());
    {
        let els2 = els.clone();
        listen!(els.layer_slider, "input", move |e: web_sys::Event| {
            let Some(slider) = current::<HtmlInputElement>(&e) else {
                return;
            };
            if let Ok(layers) = slider.value().trim().parse::<u32>() {
                render::apply(&els2, Intent::SetLayers(layers));
            }
        });
    }

    // ── Flavor ──
    {
        let els2 = els.clone();
        listen!(els.flavor_select, "change", move |e: web_sys::Event| {
            let Some(select) = current::<HtmlSelectElement>(&e) else {
                return;
            };
            let flavor = select.value().trim().parse::<u32>().ok().and_then(|id| {
                state::catalog(|c| c.flavor(id).map(FlavorSelection::from))
            });
            render::apply(&els2, Intent::SelectFlavor(flavor));
        });
    }

    // ── Icing colors and shades ──
    for part in IcingPart::ALL {
        let els2 = els.clone();
        listen!(els.icing_select(part), "change", move |e: web_sys::Event| {
            let Some(select) = current::<HtmlSelectElement>(&e) else {
                return;
            };
            let color = select
                .value()
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|id| state::catalog(|c| c.color(id).cloned()));
            if color.is_none() {
                clear_shade_radios(els2.shade_group(part));
            }
            render::apply(&els2, Intent::SelectIcingColor { part, color });
        });
    }

    for radio in dom::query_all_within(&els.root, r#"input[name^="shade"]"#) {
        let els2 = els.clone();
        listen!(radio, "change", move |e: web_sys::Event| {
            let Some(radio) = current::<HtmlInputElement>(&e) else {
                return;
            };
            if !radio.checked() {
                return;
            }
            let part = radio
                .name()
                .strip_prefix("shade")
                .and_then(IcingPart::parse);
            let tier = ShadeTier::parse(&radio.value());
            if let (Some(part), Some(tier)) = (part, tier) {
                render::apply(&els2, Intent::SelectShade { part, tier });
            }
        });
    }

    // ── Add-ons ──
    {
        let els2 = els.clone();
        listen!(els.has_message, "change", move |e: web_sys::Event| {
            if let Some(input) = current::<HtmlInputElement>(&e) {
                render::apply(&els2, Intent::ToggleMessage(input.checked()));
            }
        });
    }
    {
        let els2 = els.clone();
        listen!(els.is_rush, "change", move |e: web_sys::Event| {
            if let Some(input) = current::<HtmlInputElement>(&e) {
                render::apply(&els2, Intent::ToggleRush(input.checked()));
            }
        });
    }

    // ── Save ──
    {
        let els2 = els.clone();
        listen!(els.save_btn, "click", move |e: web_sys::Event| {
            e.prevent_default();
            render::apply(&els2, Intent::Submit);
        });
    }

    Ok(())
}

fn clear_shade_radios(group: &Element) {
    for radio in dom::query_all_within(group, r#"input[type="radio"]"#) {
        if let Some(radio) = radio.dyn_ref::<HtmlInputElement>() {
            radio.set_checked(false);
        }
    }
}
