use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::order::OrderConfiguration;
use crate::round_money;

pub const ICING_BASE_COST: Decimal = dec!(50);
pub const MESSAGE_FEE: Decimal = dec!(50);
pub const RUSH_RATE: Decimal = dec!(0.50);
/// Share of the base price charged for every layer past the first.
pub const EXTRA_LAYER_RATE: Decimal = dec!(0.20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItem {
    Base,
    Layers,
    Flavor,
    Toppings,
    Icing,
    Message,
    Rush,
    Total,
}

impl LineItem {
    pub const ALL: [LineItem; 8] = [
        LineItem::Base,
        LineItem::Layers,
        LineItem::Flavor,
        LineItem::Toppings,
        LineItem::Icing,
        LineItem::Message,
        LineItem::Rush,
        LineItem::Total,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LineItem::Base => "Base",
            LineItem::Layers => "Layers",
            LineItem::Flavor => "Flavor",
            LineItem::Toppings => "Toppings",
            LineItem::Icing => "Icing",
            LineItem::Message => "Message",
            LineItem::Rush => "Rush",
            LineItem::Total => "Total",
        }
    }
}

/// Priced view of an order. Every figure is already rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base: Decimal,
    pub layers: Decimal,
    pub flavor: Decimal,
    pub toppings: Decimal,
    pub icing: Decimal,
    pub message: Decimal,
    pub rush: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn line(&self, item: LineItem) -> Decimal {
        match item {
            LineItem::Base => self.base,
            LineItem::Layers => self.layers,
            LineItem::Flavor => self.flavor,
            LineItem::Toppings => self.toppings,
            LineItem::Icing => self.icing,
            LineItem::Message => self.message,
            LineItem::Rush => self.rush,
            LineItem::Total => self.total,
        }
    }

    pub fn formatted(&self, item: LineItem) -> String {
        crate::format_price(self.line(item))
    }

    /// Rounds every line to cents. The total is the sum of the rounded
    /// lines, so the displayed figures always add up.
    fn rounded(self) -> Self {
        let mut out = Self {
            base: round_money(self.base),
            layers: round_money(self.layers),
            flavor: round_money(self.flavor),
            toppings: round_money(self.toppings),
            icing: round_money(self.icing),
            message: round_money(self.message),
            rush: round_money(self.rush),
            total: Decimal::ZERO,
        };
        out.total = out.base
            + out.layers
            + out.flavor
            + out.toppings
            + out.icing
            + out.message
            + out.rush;
        out
    }
}

pub trait PricingPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether an estimate needs a shaded base icing before it can be saved.
    fn requires_base_icing_shade(&self) -> bool;

    fn price(&self, config: &OrderConfiguration) -> PriceBreakdown;
}

fn base_price(config: &OrderConfiguration) -> Decimal {
    config
        .size
        .as_ref()
        .map_or(Decimal::ZERO, |size| size.base_price)
}

fn flavor_price(config: &OrderConfiguration) -> Decimal {
    config
        .flavor
        .as_ref()
        .map_or(Decimal::ZERO, |flavor| flavor.price_per_layer)
}

fn toppings_price(config: &OrderConfiguration) -> Decimal {
    config.toppings.iter().map(|line| line.line_total()).sum()
}

/// Flavor is charged per layer and icing, message and rush add-ons apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredFlavorPolicy;

impl PricingPolicy for LayeredFlavorPolicy {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn requires_base_icing_shade(&self) -> bool {
        true
    }

    fn price(&self, config: &OrderConfiguration) -> PriceBreakdown {
        let base = base_price(config);
        let layers = Decimal::from(config.layers) * flavor_price(config);
        let toppings = toppings_price(config);
        let icing: Decimal = config
            .icing
            .iter()
            .filter_map(|(_, choice)| choice.shade)
            .map(|shade| ICING_BASE_COST * shade.multiplier)
            .sum();
        let message = if config.has_message {
            MESSAGE_FEE
        } else {
            Decimal::ZERO
        };

        let subtotal = base + layers + toppings + icing + message;
        let rush = if config.is_rush {
            subtotal * RUSH_RATE
        } else {
            Decimal::ZERO
        };

        let breakdown = PriceBreakdown {
            base,
            layers,
            flavor: Decimal::ZERO,
            toppings,
            icing,
            message,
            rush,
            total: subtotal + rush,
        }
        .rounded();
        debug!(policy = self.name(), total = %breakdown.total, "repriced order");
        breakdown
    }
}

/// Each extra layer costs a fifth of the base; flavor is a flat charge.
/// No icing, message or rush terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaledBasePolicy;

impl PricingPolicy for ScaledBasePolicy {
    fn name(&self) -> &'static str {
        "scaled"
    }

    fn requires_base_icing_shade(&self) -> bool {
        false
    }

    fn price(&self, config: &OrderConfiguration) -> PriceBreakdown {
        let base = base_price(config);
        let extra_layers = Decimal::from(config.layers.saturating_sub(1));
        let layers = base * EXTRA_LAYER_RATE * extra_layers;
        let flavor = flavor_price(config);
        let toppings = toppings_price(config);

        let breakdown = PriceBreakdown {
            base,
            layers,
            flavor,
            toppings,
            total: base + layers + flavor + toppings,
            ..PriceBreakdown::default()
        }
        .rounded();
        debug!(policy = self.name(), total = %breakdown.total, "repriced order");
        breakdown
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PricingPolicyKind {
    #[default]
    LayeredFlavor,
    ScaledBase,
}

impl PricingPolicyKind {
    pub fn build(self) -> Box<dyn PricingPolicy> {
        match self {
            PricingPolicyKind::LayeredFlavor => Box::new(LayeredFlavorPolicy),
            PricingPolicyKind::ScaledBase => Box::new(ScaledBasePolicy),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pricing policy `{0}` (expected `layered` or `scaled`)")]
pub struct PolicyParseError(pub String);

impl FromStr for PricingPolicyKind {
    type Err = PolicyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "layered" | "layered-flavor" | "a" => Ok(PricingPolicyKind::LayeredFlavor),
            "scaled" | "scaled-base" | "b" => Ok(PricingPolicyKind::ScaledBase),
            _ => Err(PolicyParseError(raw.to_owned())),
        }
    }
}

impl fmt::Display for PricingPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingPolicyKind::LayeredFlavor => f.write_str("layered"),
            PricingPolicyKind::ScaledBase => f.write_str("scaled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{FlavorSelection, IcingChoice, ShadeSelection, SizeSelection};
    use cb_api_types::{IcingPart, ShadeTier, ToppingRecord};

    fn sample_order() -> OrderConfiguration {
        let mut config = OrderConfiguration::new();
        config.size = Some(SizeSelection {
            name: "5x3".to_owned(),
            base_price: dec!(300),
        });
        config.layers = 3;
        config.flavor = Some(FlavorSelection {
            id: 2,
            name: "Vanilla".to_owned(),
            price_per_layer: dec!(40),
        });
        config.set_topping_quantity(
            &ToppingRecord {
                topping_id: 1,
                name: "Cherry".to_owned(),
                price: dec!(20),
            },
            2,
        );
        config
    }

    fn shaded(tier: ShadeTier) -> IcingChoice {
        IcingChoice {
            color_id: 1,
            color_name: "Red".to_owned(),
            shade: Some(ShadeSelection::for_tier(tier)),
        }
    }

    #[test]
    fn layered_policy_prices_reference_order() {
        let breakdown = LayeredFlavorPolicy.price(&sample_order());
        assert_eq!(breakdown.base, dec!(300));
        assert_eq!(breakdown.layers, dec!(120));
        assert_eq!(breakdown.toppings, dec!(40));
        assert_eq!(breakdown.icing, Decimal::ZERO);
        assert_eq!(breakdown.total, dec!(460.00));
        assert_eq!(breakdown.formatted(LineItem::Total), "\u{20B1}460.00");
    }

    #[test]
    fn scaled_policy_prices_reference_order() {
        let breakdown = ScaledBasePolicy.price(&sample_order());
        assert_eq!(breakdown.layers, dec!(120));
        assert_eq!(breakdown.flavor, dec!(40));
        assert_eq!(breakdown.toppings, dec!(40));
        assert_eq!(breakdown.total, dec!(500.00));
    }

    #[test]
    fn layered_policy_adds_icing_message_and_rush() {
        let mut config = sample_order();
        *config.icing.slot_mut(IcingPart::Base) = Some(shaded(ShadeTier::Medium));
        *config.icing.slot_mut(IcingPart::Sides) = Some(shaded(ShadeTier::Dark));
        config.has_message = true;
        config.is_rush = true;

        let breakdown = LayeredFlavorPolicy.price(&config);
        // 50 * 1.25 + 50 * 1.5
        assert_eq!(breakdown.icing, dec!(137.50));
        assert_eq!(breakdown.message, MESSAGE_FEE);
        // (460 + 137.5 + 50) / 2
        assert_eq!(breakdown.rush, dec!(323.75));
        assert_eq!(breakdown.total, dec!(971.25));
    }

    #[test]
    fn icing_color_without_shade_costs_nothing() {
        let mut config = sample_order();
        *config.icing.slot_mut(IcingPart::Base) = Some(IcingChoice {
            color_id: 3,
            color_name: "Blue".to_owned(),
            shade: None,
        });
        assert_eq!(LayeredFlavorPolicy.price(&config).icing, Decimal::ZERO);
    }

    #[test]
    fn scaled_policy_ignores_add_ons() {
        let mut config = sample_order();
        *config.icing.slot_mut(IcingPart::Base) = Some(shaded(ShadeTier::Dark));
        config.has_message = true;
        config.is_rush = true;

        let breakdown = ScaledBasePolicy.price(&config);
        assert_eq!(breakdown.icing, Decimal::ZERO);
        assert_eq!(breakdown.message, Decimal::ZERO);
        assert_eq!(breakdown.rush, Decimal::ZERO);
        assert_eq!(breakdown.total, dec!(500));
    }

    #[test]
    fn single_layer_has_no_scaled_layer_cost() {
        let mut config = sample_order();
        config.layers = 1;
        assert_eq!(ScaledBasePolicy.price(&config).layers, Decimal::ZERO);
    }

    #[test]
    fn empty_order_is_free_under_both_policies() {
        let config = OrderConfiguration::new();
        for kind in [PricingPolicyKind::LayeredFlavor, PricingPolicyKind::ScaledBase] {
            assert_eq!(kind.build().price(&config), PriceBreakdown::default());
        }
    }

    #[test]
    fn totals_stay_non_negative_and_match_line_sums() {
        let base_prices = [dec!(0), dec!(200), dec!(300), dec!(400)];
        let flavor_prices = [dec!(0), dec!(40), dec!(65)];
        for base_price in base_prices {
            for price_per_layer in flavor_prices {
                for layers in 1..=crate::MAX_LAYERS {
                    let mut config = sample_order();
                    config.size.as_mut().unwrap().base_price = base_price;
                    config.flavor.as_mut().unwrap().price_per_layer = price_per_layer;
                    config.layers = layers;
                    config.is_rush = layers % 2 == 0;

                    let a = LayeredFlavorPolicy.price(&config);
                    let b = ScaledBasePolicy.price(&config);
                    assert!(a.total >= Decimal::ZERO);
                    assert!(b.total >= Decimal::ZERO);

                    let a_sub = a.base + a.layers + a.toppings + a.icing + a.message;
                    assert_eq!(a.total, a_sub + a.rush);
                    assert_eq!(b.total, b.base + b.layers + b.flavor + b.toppings);
                }
            }
        }
    }

    #[test]
    fn sub_cent_prices_keep_lines_and_total_consistent() {
        let mut config = sample_order();
        config.size.as_mut().unwrap().base_price = dec!(100.005);
        config.layers = 1;
        config.flavor.as_mut().unwrap().price_per_layer = dec!(0.005);
        config.toppings.clear();

        for kind in [PricingPolicyKind::LayeredFlavor, PricingPolicyKind::ScaledBase] {
            let breakdown = kind.build().price(&config);
            let lines: Decimal = LineItem::ALL
                .iter()
                .filter(|item| **item != LineItem::Total)
                .map(|item| breakdown.line(*item))
                .sum();
            assert_eq!(breakdown.total, lines, "{kind}");
            assert_eq!(breakdown.total, dec!(100.02), "{kind}");
        }
    }

    #[test]
    fn policy_kind_parses_aliases() {
        assert_eq!("A".parse(), Ok(PricingPolicyKind::LayeredFlavor));
        assert_eq!(" scaled ".parse(), Ok(PricingPolicyKind::ScaledBase));
        assert_eq!(
            "flat".parse::<PricingPolicyKind>(),
            Err(PolicyParseError("flat".to_owned()))
        );
        assert_eq!(PricingPolicyKind::default().build().name(), "layered");
    }
}
