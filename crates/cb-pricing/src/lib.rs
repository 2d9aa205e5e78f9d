//! Cake order model and pricing.
//!
//! `order` holds the in-progress configuration; `policy` turns it into a
//! `PriceBreakdown`. Money is `Decimal` throughout and is only rounded when a
//! breakdown is produced.

pub mod order;
pub mod policy;

pub use order::{
    FlavorSelection, IcingChoice, IcingSelection, MAX_LAYERS, MAX_TOPPING_QUANTITY, MIN_LAYERS,
    OrderConfiguration, ShadeSelection, SizeSelection, ToppingLine,
};
pub use policy::{
    EXTRA_LAYER_RATE, ICING_BASE_COST, LayeredFlavorPolicy, LineItem, MESSAGE_FEE,
    PolicyParseError, PriceBreakdown, PricingPolicy, PricingPolicyKind, RUSH_RATE,
    ScaledBasePolicy,
};

use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_PREFIX: &str = "\u{20B1}";

/// Rounds to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display, e.g. `₱460.00`.
pub fn format_price(value: Decimal) -> String {
    format!("{CURRENCY_PREFIX}{:.2}", round_money(value))
}
