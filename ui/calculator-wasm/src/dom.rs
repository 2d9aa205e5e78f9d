//! DOM element bindings.
//!
//! All static elements of the calculator page are resolved once at startup.
//! Catalog-driven controls (size cards, topping rows, options) are created
//! later by `catalog.rs` inside the containers held here.

use cb_api_types::IcingPart;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

fn collect(nl: Option<web_sys::NodeList>) -> Vec<Element> {
    let Some(nl) = nl else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    collect(parent.query_selector_all(selector).ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_inner_html("");
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_visible(el: &Element, visible: bool) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html
            .style()
            .set_property("display", if visible { "block" } else { "none" });
    }
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    gloo_utils::document().create_element(tag)
}

pub fn create_option(value: &str, text: &str) -> Result<HtmlOptionElement, JsValue> {
    let opt: HtmlOptionElement = create_element("option")?.dyn_into()?;
    opt.set_value(value);
    opt.set_text_content(Some(text));
    Ok(opt)
}

/// Removes every option except the leading placeholder.
pub fn reset_select(sel: &HtmlSelectElement) {
    if sel.length() > 1 {
        sel.set_length(1);
    }
}

pub fn data_attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{name}"))
        .filter(|value| !value.trim().is_empty())
}

pub fn data_u32(el: &Element, name: &str) -> Option<u32> {
    data_attr(el, name)?.trim().parse().ok()
}

// ── Elements struct ──

/// All static DOM references used by the calculator.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub root: Element,

    // Choices
    pub base_cake_select: HtmlSelectElement,
    pub size_options: Element,
    pub layer_slider: HtmlInputElement,
    pub layer_count: Element,
    pub flavor_select: HtmlSelectElement,
    pub toppings_list: Element,
    pub icing_base: HtmlSelectElement,
    pub icing_sides: HtmlSelectElement,
    pub icing_other: HtmlSelectElement,
    pub shade_base: Element,
    pub shade_sides: Element,
    pub shade_other: Element,
    pub has_message: HtmlInputElement,
    pub is_rush: HtmlInputElement,

    // Price lines
    pub price_base: Element,
    pub price_layers: Element,
    pub price_flavor: Element,
    pub price_toppings: Element,
    pub price_icing: Element,
    pub price_message: Element,
    pub price_rush: Element,
    pub price_total: Element,
    pub total_price: Element,

    // Submission
    pub save_btn: HtmlElement,
    pub notifications: Element,
}

impl Elements {
    pub fn icing_select(&self, part: IcingPart) -> &HtmlSelectElement {
        match part {
            IcingPart::Base => &self.icing_base,
            IcingPart::Sides => &self.icing_sides,
            IcingPart::Other => &self.icing_other,
        }
    }

    pub fn shade_group(&self, part: IcingPart) -> &Element {
        match part {
            IcingPart::Base => &self.shade_base,
            IcingPart::Sides => &self.shade_sides,
            IcingPart::Other => &self.shade_other,
        }
    }
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_select {
    ($id:expr) => {
        by_id_typed::<HtmlSelectElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing select #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            root: get_el!("calculatorApp"),

            base_cake_select: get_select!("baseCakeSelect"),
            size_options: get_el!("sizeOptions"),
            layer_slider: get_input!("layerSlider"),
            layer_count: get_el!("layerCount"),
            flavor_select: get_select!("flavorSelect"),
            toppings_list: get_el!("toppingsList"),
            icing_base: get_select!("icingBase"),
            icing_sides: get_select!("icingSides"),
            icing_other: get_select!("icingOther"),
            shade_base: get_el!("shadeBase"),
            shade_sides: get_el!("shadeSides"),
            shade_other: get_el!("shadeOther"),
            has_message: get_input!("hasMessage"),
            is_rush: get_input!("isRush"),

            price_base: get_el!("priceBase"),
            price_layers: get_el!("priceLayers"),
            price_flavor: get_el!("priceFlavor"),
            price_toppings: get_el!("priceToppings"),
            price_icing: get_el!("priceIcing"),
            price_message: get_el!("priceMessage"),
            price_rush: get_el!("priceRush"),
            price_total: get_el!("priceTotal"),
            total_price: get_el!("totalPrice"),

            save_btn: get_html!("saveEstimateBtn"),
            notifications: get_el!("notificationArea"),
        })
    }
}
