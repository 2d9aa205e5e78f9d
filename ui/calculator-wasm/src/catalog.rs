//! Catalog loading and control population.
//!
//! One task per catalog kind. Each kind renders as soon as its own fetch
//! settles; failed fetches have already been swapped for the fallback
//! collection by the loader.

use std::rc::Rc;

use cb_api_types::IcingPart;
use cb_calculator_core::Intent;
use cb_catalog_client::{
    CatalogKind, CatalogOrigin, load_cakes, load_colors, load_flavors, load_sizes, load_toppings,
};
use cb_pricing::{MAX_TOPPING_QUANTITY, SizeSelection, format_price};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement};

use crate::api::FetchBackend;
use crate::dom::{self, Elements};
use crate::events::{current, listen};
use crate::render;
use crate::state;

macro_rules! spawn_load {
    ($els:expr, $backend:expr, $kind:expr, $loader:ident, $field:ident, $render:ident) => {{
        let els = $els.clone();
        let backend = Rc::clone(&$backend);
        wasm_bindgen_futures::spawn_local(async move {
            let loaded = $loader(backend.as_ref()).await;
            log_origin($kind, loaded.origin, loaded.items.len());
            state::catalog_mut(|c| c.$field = loaded.items);
            if let Err(err) = $render(&els) {
                gloo_console::error!(format!("render {}: {:?}", $kind, err));
            }
        });
    }};
}

pub fn load_all(els: &Elements) {
    let backend = Rc::new(FetchBackend::new(state::api_url()));
    spawn_load!(els, backend, CatalogKind::Cakes, load_cakes, cakes, render_cakes);
    spawn_load!(els, backend, CatalogKind::Sizes, load_sizes, sizes, render_sizes);
    spawn_load!(els, backend, CatalogKind::Flavors, load_flavors, flavors, render_flavors);
    spawn_load!(els, backend, CatalogKind::Toppings, load_toppings, toppings, render_toppings);
    spawn_load!(els, backend, CatalogKind::Colors, load_colors, colors, render_colors);
}

fn log_origin(kind: CatalogKind, origin: CatalogOrigin, count: usize) {
    match origin {
        CatalogOrigin::Remote => gloo_console::log!(format!("loaded {count} {kind}")),
        CatalogOrigin::Fallback => {
            gloo_console::warn!(format!("{kind} unavailable, using {count} built-in entries"))
        }
    }
}

// ── Base cakes ──

fn render_cakes(els: &Elements) -> Result<(), JsValue> {
    dom::reset_select(&els.base_cake_select);
    let cakes = state::catalog(|c| c.cakes.clone());
    for cake in &cakes {
        let label = if cake.category.is_empty() {
            cake.name.clone()
        } else {
            format!("{} ({})", cake.name, cake.category)
        };
        let opt = dom::create_option(&cake.cake_id.to_string(), &label)?;
        els.base_cake_select.add_with_html_option_element(&opt)?;
    }
    Ok(())
}

// ── Sizes ──

fn render_sizes(els: &Elements) -> Result<(), JsValue> {
    dom::clear(&els.size_options);
    let sizes = state::catalog(|c| c.sizes.clone());
    for size in &sizes {
        let card = dom::create_element("div")?;
        dom::add_class(&card, "size-option");
        card.set_attribute("data-size", &size.name)?;

        let title = dom::create_element("strong")?;
        dom::set_text(&title, &size.name);
        card.append_child(&title)?;

        if let Some(description) = &size.description {
            let desc = dom::create_element("small")?;
            dom::set_text(&desc, description);
            card.append_child(&desc)?;
        }

        let price = dom::create_element("span")?;
        dom::add_class(&price, "size-price");
        dom::set_text(&price, &format_price(size.base_price));
        card.append_child(&price)?;

        let els2 = els.clone();
        listen!(card, "click", move |e: web_sys::Event| {
            let Some(card) = current::<Element>(&e) else {
                return;
            };
            let Some(name) = dom::data_attr(&card, "size") else {
                return;
            };
            let selection = state::catalog(|c| c.size(&name).map(SizeSelection::from));
            if let Some(selection) = selection {
                render::apply(&els2, Intent::SelectSize(selection));
            }
        });

        els.size_options.append_child(&card)?;
    }
    render::sync_controls(els, &state::configuration());
    Ok(())
}

// ── Flavors ──

fn render_flavors(els: &Elements) -> Result<(), JsValue> {
    dom::reset_select(&els.flavor_select);
    let flavors = state::catalog(|c| c.flavors.clone());
    for flavor in &flavors {
        let label = format!(
            "{} ({}/layer)",
            flavor.name,
            format_price(flavor.price_per_layer)
        );
        let opt = dom::create_option(&flavor.flavor_id.to_string(), &label)?;
        els.flavor_select.add_with_html_option_element(&opt)?;
    }
    Ok(())
}

// ── Toppings ──

fn render_toppings(els: &Elements) -> Result<(), JsValue> {
    dom::clear(&els.toppings_list);
    let toppings = state::catalog(|c| c.toppings.clone());
    for topping in &toppings {
        let id = topping.topping_id.to_string();

        let row = dom::create_element("div")?;
        dom::add_class(&row, "topping-item");
        row.set_attribute("data-id", &id)?;

        let label = dom::create_element("span")?;
        dom::add_class(&label, "topping-name");
        dom::set_text(
            &label,
            &format!("{} ({})", topping.name, format_price(topping.price)),
        );
        row.append_child(&label)?;

        let dec = adjust_button(els, "\u{2212}", "topping-dec", topping.topping_id, -1)?;
        row.append_child(&dec)?;

        let input: HtmlInputElement = dom::create_element("input")?.dyn_into()?;
        input.set_type("number");
        input.set_min("0");
        input.set_max(&MAX_TOPPING_QUANTITY.to_string());
        input.set_value("0");
        input.set_class_name("topping-quantity");
        input.set_attribute("data-id", &id)?;
        {
            let els2 = els.clone();
            let topping_id = topping.topping_id;
            listen!(input, "change", move |e: web_sys::Event| {
                let Some(input) = current::<HtmlInputElement>(&e) else {
                    return;
                };
                let Some(topping) = state::catalog(|c| c.topping(topping_id).cloned()) else {
                    return;
                };
                // Garbage input counts as zero; the reducer clamps the rest.
                let quantity = input.value().trim().parse::<u32>().unwrap_or(0);
                render::apply(&els2, Intent::SetToppingQuantity { topping, quantity });
            });
        }
        row.append_child(&input)?;

        let inc = adjust_button(els, "+", "topping-inc", topping.topping_id, 1)?;
        row.append_child(&inc)?;

        els.toppings_list.append_child(&row)?;
    }
    render::sync_controls(els, &state::configuration());
    Ok(())
}

fn adjust_button(
    els: &Elements,
    text: &str,
    class: &str,
    topping_id: u32,
    delta: i32,
) -> Result<Element, JsValue> {
    let button = dom::create_element("button")?;
    button.set_attribute("type", "button")?;
    dom::add_class(&button, class);
    dom::set_text(&button, text);

    let els2 = els.clone();
    listen!(button, "click", move |_: web_sys::Event| {
        if let Some(topping) = state::catalog(|c| c.topping(topping_id).cloned()) {
            render::apply(&els2, Intent::AdjustTopping { topping, delta });
        }
    });
    Ok(button)
}

// ── Icing colors ──

fn render_colors(els: &Elements) -> Result<(), JsValue> {
    let colors = state::catalog(|c| c.colors.clone());
    for part in IcingPart::ALL {
        let select = els.icing_select(part);
        dom::reset_select(select);
        for color in &colors {
            let opt = dom::create_option(&color.color_id.to_string(), &color.color_name)?;
            opt.set_attribute("data-hex", &color.hex_code)?;
            select.add_with_html_option_element(&opt)?;
        }
    }
    render::sync_controls(els, &state::configuration());
    Ok(())
}
