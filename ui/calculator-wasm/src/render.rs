//! Rendering driven off the calculator state.
//!
//! Every handler goes through [`apply`]: dispatch the intent, then redraw
//! the price lines and resync the controls from the configuration.

use cb_calculator_core::{Effect, Intent};
use cb_pricing::{LineItem, OrderConfiguration, PriceBreakdown};

use crate::dom::{self, Elements};
use crate::state;
use crate::submit;

pub fn apply(els: &Elements, intent: Intent) {
    match state::dispatch(intent) {
        Effect::Render(breakdown) => {
            render_breakdown(els, &breakdown);
            sync_controls(els, &state::configuration());
        }
        Effect::Submit(prepared) => submit::send(els, prepared),
    }
}

pub fn render_all(els: &Elements) {
    render_breakdown(els, &state::breakdown());
    sync_controls(els, &state::configuration());
}

pub fn render_breakdown(els: &Elements, breakdown: &PriceBreakdown) {
    let lines = [
        (&els.price_base, LineItem::Base),
        (&els.price_layers, LineItem::Layers),
        (&els.price_flavor, LineItem::Flavor),
        (&els.price_toppings, LineItem::Toppings),
        (&els.price_icing, LineItem::Icing),
        (&els.price_message, LineItem::Message),
        (&els.price_rush, LineItem::Rush),
        (&els.price_total, LineItem::Total),
        (&els.total_price, LineItem::Total),
    ];
    for (el, item) in lines {
        dom::set_text(el, &breakdown.formatted(item));
    }
}

/// Brings derived views in line with the configuration: selected size card,
/// layer label, shade pickers and topping counters.
pub fn sync_controls(els: &Elements, config: &OrderConfiguration) {
    let selected_size = config.size.as_ref().map(|size| size.name.as_str());
    for card in dom::query_all_within(&els.size_options, ".size-option") {
        let is_selected = dom::data_attr(&card, "size").as_deref() == selected_size;
        dom::toggle_class(&card, "selected", is_selected && selected_size.is_some());
    }

    dom::set_text(&els.layer_count, &config.layers.to_string());

    for part in cb_api_types::IcingPart::ALL {
        dom::set_visible(els.shade_group(part), config.icing.get(part).is_some());
    }

    for input in dom::query_all_within(&els.toppings_list, "input.topping-quantity") {
        let Some(id) = dom::data_u32(&input, "id") else {
            continue;
        };
        if let Some(input) = wasm_bindgen::JsCast::dyn_ref::<web_sys::HtmlInputElement>(&input) {
            input.set_value(&config.topping_quantity(id).to_string());
        }
    }
}
