use anyhow::Result;
use async_trait::async_trait;
use cb_api_types::{
    CakeRecord, ColorRecord, EstimateReceipt, EstimateRequest, FlavorRecord, SizeRecord,
    ToppingRecord,
};
use std::fmt;
use tracing::{debug, warn};

pub mod fallback;

pub const ESTIMATES_PATH: &str = "/api/estimates";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Cakes,
    Sizes,
    Flavors,
    Toppings,
    Colors,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 5] = [
        CatalogKind::Cakes,
        CatalogKind::Sizes,
        CatalogKind::Flavors,
        CatalogKind::Toppings,
        CatalogKind::Colors,
    ];

    pub fn path(self) -> &'static str {
        match self {
            CatalogKind::Cakes => "/api/cakes",
            CatalogKind::Sizes => "/api/sizes",
            CatalogKind::Flavors => "/api/flavors",
            CatalogKind::Toppings => "/api/toppings",
            CatalogKind::Colors => "/api/colors",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogKind::Cakes => "cakes",
            CatalogKind::Sizes => "sizes",
            CatalogKind::Flavors => "flavors",
            CatalogKind::Toppings => "toppings",
            CatalogKind::Colors => "colors",
        };
        f.write_str(name)
    }
}

/// Reference data provider. Implementations run on a single-threaded UI
/// runtime, so futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait CatalogSource {
    async fn fetch_cakes(&self) -> Result<Vec<CakeRecord>>;
    async fn fetch_sizes(&self) -> Result<Vec<SizeRecord>>;
    async fn fetch_flavors(&self) -> Result<Vec<FlavorRecord>>;
    async fn fetch_toppings(&self) -> Result<Vec<ToppingRecord>>;
    async fn fetch_colors(&self) -> Result<Vec<ColorRecord>>;
}

/// Destination for saved estimates. Any error (transport or non-success
/// status) must be returned, never swallowed.
#[async_trait(?Send)]
pub trait EstimateSink {
    async fn save_estimate(&self, request: &EstimateRequest) -> Result<EstimateReceipt>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub origin: CatalogOrigin,
}

fn or_fallback<T>(kind: CatalogKind, fetched: Result<Vec<T>>, fallback: fn() -> Vec<T>) -> Loaded<T> {
    match fetched {
        Ok(items) => {
            debug!(%kind, count = items.len(), "catalog loaded from backend");
            Loaded {
                items,
                origin: CatalogOrigin::Remote,
            }
        }
        Err(err) => {
            warn!(%kind, "catalog fetch failed, using built-in data: {err:#}");
            Loaded {
                items: fallback(),
                origin: CatalogOrigin::Fallback,
            }
        }
    }
}

pub async fn load_cakes<S: CatalogSource + ?Sized>(source: &S) -> Loaded<CakeRecord> {
    or_fallback(CatalogKind::Cakes, source.fetch_cakes().await, fallback::cakes)
}

pub async fn load_sizes<S: CatalogSource + ?Sized>(source: &S) -> Loaded<SizeRecord> {
    or_fallback(CatalogKind::Sizes, source.fetch_sizes().await, fallback::sizes)
}

pub async fn load_flavors<S: CatalogSource + ?Sized>(source: &S) -> Loaded<FlavorRecord> {
    or_fallback(CatalogKind::Flavors, source.fetch_flavors().await, fallback::flavors)
}

pub async fn load_toppings<S: CatalogSource + ?Sized>(source: &S) -> Loaded<ToppingRecord> {
    or_fallback(CatalogKind::Toppings, source.fetch_toppings().await, fallback::toppings)
}

pub async fn load_colors<S: CatalogSource + ?Sized>(source: &S) -> Loaded<ColorRecord> {
    or_fallback(CatalogKind::Colors, source.fetch_colors().await, fallback::colors)
}

/// The save endpoint has no body contract; pick up an id if one is echoed.
pub fn parse_receipt(body: &str) -> EstimateReceipt {
    let estimate_id = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("estimate_id")? {
            serde_json::Value::String(id) => Some(id.clone()),
            serde_json::Value::Number(id) => Some(id.to_string()),
            _ => None,
        });
    EstimateReceipt { estimate_id }
}

/// All reference data currently rendered on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub cakes: Vec<CakeRecord>,
    pub sizes: Vec<SizeRecord>,
    pub flavors: Vec<FlavorRecord>,
    pub toppings: Vec<ToppingRecord>,
    pub colors: Vec<ColorRecord>,
}

impl Catalog {
    /// The built-in data set, usable without any backend.
    pub fn fallback() -> Self {
        Self {
            cakes: fallback::cakes(),
            sizes: fallback::sizes(),
            flavors: fallback::flavors(),
            toppings: fallback::toppings(),
            colors: fallback::colors(),
        }
    }

    pub fn size(&self, name: &str) -> Option<&SizeRecord> {
        self.sizes.iter().find(|size| size.name == name)
    }

    pub fn flavor(&self, flavor_id: u32) -> Option<&FlavorRecord> {
        self.flavors.iter().find(|flavor| flavor.flavor_id == flavor_id)
    }

    pub fn topping(&self, topping_id: u32) -> Option<&ToppingRecord> {
        self.toppings
            .iter()
            .find(|topping| topping.topping_id == topping_id)
    }

    pub fn color(&self, color_id: u32) -> Option<&ColorRecord> {
        self.colors.iter().find(|color| color.color_id == color_id)
    }
}
