//! Built-in catalog used whenever the backend cannot be reached.

use cb_api_types::{CakeRecord, ColorRecord, FlavorRecord, SizeRecord, ToppingRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// No base cakes ship with the fallback set; choosing one is optional.
pub fn cakes() -> Vec<CakeRecord> {
    Vec::new()
}

pub fn sizes() -> Vec<SizeRecord> {
    let size = |size_id, name: &str, description: &str, base_price| SizeRecord {
        size_id,
        name: name.to_owned(),
        description: Some(description.to_owned()),
        base_price,
    };
    vec![
        size(1, "4x3", "4 inches diameter, 3 inches height", dec!(200)),
        size(2, "5x3", "5 inches diameter, 3 inches height", dec!(300)),
        size(3, "6x3", "6 inches diameter, 3 inches height", dec!(400)),
    ]
}

pub fn flavors() -> Vec<FlavorRecord> {
    let flavor = |flavor_id, name: &str, price_per_layer| FlavorRecord {
        flavor_id,
        name: name.to_owned(),
        price_per_layer,
    };
    vec![
        flavor(1, "Chocolate", dec!(50)),
        flavor(2, "Vanilla", dec!(40)),
        flavor(3, "Red Velvet", dec!(60)),
        flavor(4, "Strawberry", dec!(55)),
        flavor(5, "Ube", dec!(65)),
    ]
}

pub fn toppings() -> Vec<ToppingRecord> {
    let items: [(&str, Decimal); 10] = [
        ("Cherry", dec!(20)),
        ("Strawberry", dec!(25)),
        ("Chocolate Chips", dec!(15)),
        ("Sprinkles", dec!(10)),
        ("Oreo Crumbs", dec!(30)),
        ("Macaron", dec!(35)),
        ("Fresh Berries", dec!(40)),
        ("Caramel Drizzle", dec!(20)),
        ("Whipped Cream", dec!(15)),
        ("Edible Flowers", dec!(50)),
    ];
    (1..)
        .zip(items)
        .map(|(topping_id, (name, price))| ToppingRecord {
            topping_id,
            name: name.to_owned(),
            price,
        })
        .collect()
}

pub fn colors() -> Vec<ColorRecord> {
    let items = [
        ("Red", "#FF0000"),
        ("Pink", "#FFC0CB"),
        ("Blue", "#0000FF"),
        ("Green", "#00FF00"),
        ("Yellow", "#FFFF00"),
        ("Purple", "#800080"),
        ("Orange", "#FFA500"),
        ("Brown", "#8B4513"),
        ("White", "#FFFFFF"),
        ("Black", "#000000"),
    ];
    (1..)
        .zip(items)
        .map(|(color_id, (color_name, hex_code))| ColorRecord {
            color_id,
            color_name: color_name.to_owned(),
            hex_code: hex_code.to_owned(),
        })
        .collect()
}
