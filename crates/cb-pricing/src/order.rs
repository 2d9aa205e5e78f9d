use cb_api_types::{
    ColorRecord, FlavorRecord, IcingPart, ShadeTier, SizeRecord, ToppingRecord,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MIN_LAYERS: u32 = 1;
pub const MAX_LAYERS: u32 = 5;
pub const MAX_TOPPING_QUANTITY: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SizeSelection {
    pub name: String,
    pub base_price: Decimal,
}

impl From<&SizeRecord> for SizeSelection {
    fn from(record: &SizeRecord) -> Self {
        Self {
            name: record.name.clone(),
            base_price: record.base_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlavorSelection {
    pub id: u32,
    pub name: String,
    pub price_per_layer: Decimal,
}

impl From<&FlavorRecord> for FlavorSelection {
    fn from(record: &FlavorRecord) -> Self {
        Self {
            id: record.flavor_id,
            name: record.name.clone(),
            price_per_layer: record.price_per_layer,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToppingLine {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl ToppingLine {
    pub fn from_record(record: &ToppingRecord, quantity: u32) -> Self {
        Self {
            id: record.topping_id,
            name: record.name.clone(),
            price: record.price,
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeSelection {
    pub tier: ShadeTier,
    pub multiplier: Decimal,
}

impl ShadeSelection {
    pub fn for_tier(tier: ShadeTier) -> Self {
        let multiplier = match tier {
            ShadeTier::Light => dec!(1.00),
            ShadeTier::Medium => dec!(1.25),
            ShadeTier::Dark => dec!(1.50),
        };
        Self { tier, multiplier }
    }
}

/// One icing part. A color without a shade is a valid state while the shade
/// picker is open; it contributes nothing to the price until a shade lands.
#[derive(Debug, Clone, PartialEq)]
pub struct IcingChoice {
    pub color_id: u32,
    pub color_name: String,
    pub shade: Option<ShadeSelection>,
}

impl IcingChoice {
    pub fn from_color(color: &ColorRecord) -> Self {
        Self {
            color_id: color.color_id,
            color_name: color.color_name.clone(),
            shade: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IcingSelection {
    pub base: Option<IcingChoice>,
    pub sides: Option<IcingChoice>,
    pub other: Option<IcingChoice>,
}

impl IcingSelection {
    pub fn get(&self, part: IcingPart) -> Option<&IcingChoice> {
        match part {
            IcingPart::Base => self.base.as_ref(),
            IcingPart::Sides => self.sides.as_ref(),
            IcingPart::Other => self.other.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, part: IcingPart) -> &mut Option<IcingChoice> {
        match part {
            IcingPart::Base => &mut self.base,
            IcingPart::Sides => &mut self.sides,
            IcingPart::Other => &mut self.other,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (IcingPart, &IcingChoice)> {
        IcingPart::ALL
            .into_iter()
            .filter_map(|part| self.get(part).map(|choice| (part, choice)))
    }
}

/// Everything the customer has picked so far.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfiguration {
    pub base_cake_id: Option<u32>,
    pub size: Option<SizeSelection>,
    pub layers: u32,
    pub flavor: Option<FlavorSelection>,
    pub toppings: Vec<ToppingLine>,
    pub icing: IcingSelection,
    pub has_message: bool,
    pub is_rush: bool,
}

impl Default for OrderConfiguration {
    fn default() -> Self {
        Self {
            base_cake_id: None,
            size: None,
            layers: MIN_LAYERS,
            flavor: None,
            toppings: Vec::new(),
            icing: IcingSelection::default(),
            has_message: false,
            is_rush: false,
        }
    }
}

impl OrderConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topping_quantity(&self, topping_id: u32) -> u32 {
        self.toppings
            .iter()
            .find(|line| line.id == topping_id)
            .map_or(0, |line| line.quantity)
    }

    /// Sets a topping's quantity, clamped to `0..=MAX_TOPPING_QUANTITY`.
    /// Zero removes the line entirely.
    pub fn set_topping_quantity(&mut self, topping: &ToppingRecord, quantity: u32) {
        let quantity = quantity.min(MAX_TOPPING_QUANTITY);
        let position = self
            .toppings
            .iter()
            .position(|line| line.id == topping.topping_id);

        match (position, quantity) {
            (Some(index), 0) => {
                self.toppings.remove(index);
            }
            (Some(index), qty) => self.toppings[index].quantity = qty,
            (None, 0) => {}
            (None, qty) => self.toppings.push(ToppingLine::from_record(topping, qty)),
        }
    }

    /// Moves a topping's quantity by `delta`, saturating at both bounds.
    pub fn adjust_topping(&mut self, topping: &ToppingRecord, delta: i32) {
        let current = i64::from(self.topping_quantity(topping.topping_id));
        let next = (current + i64::from(delta)).clamp(0, i64::from(MAX_TOPPING_QUANTITY));
        self.set_topping_quantity(topping, u32::try_from(next).unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cherry() -> ToppingRecord {
        ToppingRecord {
            topping_id: 1,
            name: "Cherry".to_owned(),
            price: dec!(20),
        }
    }

    #[test]
    fn new_configuration_starts_with_one_layer_and_nothing_selected() {
        let config = OrderConfiguration::new();
        assert_eq!(config.layers, 1);
        assert!(config.size.is_none());
        assert!(config.toppings.is_empty());
        assert_eq!(config.icing.iter().count(), 0);
    }

    #[test]
    fn zero_quantity_removes_topping_line() {
        let mut config = OrderConfiguration::new();
        config.set_topping_quantity(&cherry(), 3);
        assert_eq!(config.topping_quantity(1), 3);

        config.set_topping_quantity(&cherry(), 0);
        assert!(config.toppings.is_empty());
    }

    #[test]
    fn adjust_topping_saturates_at_both_bounds() {
        let mut config = OrderConfiguration::new();
        config.adjust_topping(&cherry(), -1);
        assert!(config.toppings.is_empty());

        for _ in 0..12 {
            config.adjust_topping(&cherry(), 1);
        }
        assert_eq!(config.topping_quantity(1), MAX_TOPPING_QUANTITY);
        assert_eq!(config.toppings.len(), 1);

        config.adjust_topping(&cherry(), -25);
        assert!(config.toppings.is_empty());
    }

    #[test]
    fn numeric_quantity_above_limit_is_clamped() {
        let mut config = OrderConfiguration::new();
        config.set_topping_quantity(&cherry(), 40);
        assert_eq!(config.topping_quantity(1), MAX_TOPPING_QUANTITY);
    }

    #[test]
    fn shade_tiers_carry_fixed_multipliers() {
        assert_eq!(ShadeSelection::for_tier(ShadeTier::Light).multiplier, dec!(1));
        assert_eq!(ShadeSelection::for_tier(ShadeTier::Medium).multiplier, dec!(1.25));
        assert_eq!(ShadeSelection::for_tier(ShadeTier::Dark).multiplier, dec!(1.5));
    }
}
