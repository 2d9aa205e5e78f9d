use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ── Catalog records (GET /api/*) ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CakeRecord {
    pub cake_id: u32,
    /// Table rows from the cake admin carry `cake_name`/`flavor` instead.
    #[serde(alias = "cake_name")]
    pub name: String,
    #[serde(default, alias = "flavor")]
    pub category: String,
    #[serde(default)]
    pub base_price_4x3: Decimal,
    #[serde(default)]
    pub base_price_5x3: Decimal,
    #[serde(default)]
    pub base_price_6x3: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeRecord {
    pub size_id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlavorRecord {
    pub flavor_id: u32,
    pub name: String,
    pub price_per_layer: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToppingRecord {
    pub topping_id: u32,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorRecord {
    pub color_id: u32,
    pub color_name: String,
    #[serde(default)]
    pub hex_code: String,
}

// ── Icing vocabulary ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IcingPart {
    Base,
    Sides,
    Other,
}

impl IcingPart {
    pub const ALL: [IcingPart; 3] = [IcingPart::Base, IcingPart::Sides, IcingPart::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            IcingPart::Base => "base",
            IcingPart::Sides => "sides",
            IcingPart::Other => "other",
        }
    }

    /// Parses the `data-part` attribute value; case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "base" => Some(IcingPart::Base),
            "sides" => Some(IcingPart::Sides),
            "other" => Some(IcingPart::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShadeTier {
    Light,
    Medium,
    Dark,
}

impl ShadeTier {
    pub const ALL: [ShadeTier; 3] = [ShadeTier::Light, ShadeTier::Medium, ShadeTier::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            ShadeTier::Light => "light",
            ShadeTier::Medium => "medium",
            ShadeTier::Dark => "dark",
        }
    }

    /// Parses a shade radio value; case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ShadeTier::Light),
            "medium" => Some(ShadeTier::Medium),
            "dark" => Some(ShadeTier::Dark),
            _ => None,
        }
    }
}

// ── Estimate submission (POST /api/estimates) ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimateTopping {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateIcingPart {
    pub color_id: u32,
    pub color_name: String,
    pub shade: Option<ShadeTier>,
    pub multiplier: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EstimateIcing {
    pub base: Option<EstimateIcingPart>,
    pub sides: Option<EstimateIcingPart>,
    pub other: Option<EstimateIcingPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimateRequest {
    pub cake_id: Option<u32>,
    pub size: String,
    pub num_layers: u32,
    pub flavor_id: u32,
    pub toppings: Vec<EstimateTopping>,
    pub icing: EstimateIcing,
    pub has_message: bool,
    pub is_rush: bool,
    pub total_price: Decimal,
}

/// What the caller learns from a successful save. The backend body is not
/// contractual, so the id is only present when the server echoes one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EstimateReceipt {
    #[serde(default)]
    pub estimate_id: Option<String>,
}
