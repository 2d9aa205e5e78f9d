use anyhow::{Context, Result};
use async_trait::async_trait;
use cb_api_types::{
    CakeRecord, ColorRecord, EstimateReceipt, EstimateRequest, FlavorRecord, SizeRecord,
    ToppingRecord,
};
use cb_calculator_core::{Calculator, CalculatorConfig, ConfigError, SubmitOutcome};
use cb_catalog_client::{
    Catalog, CatalogKind, CatalogSource, ESTIMATES_PATH, EstimateSink, load_cakes, load_colors,
    load_flavors, load_sizes, load_toppings, parse_receipt,
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:5001";

/// HTTP backend for the Crumbear catalog and estimate endpoints.
///
/// The endpoint comes from [`CalculatorConfig::api_url`]; an empty value
/// means [`DEFAULT_API_URL`].
pub struct HttpBackend {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpBackend {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &CalculatorConfig) -> Self {
        Self::new(Some(config.api_url.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_catalog<T: DeserializeOwned>(&self, kind: CatalogKind) -> Result<Vec<T>> {
        let url = format!("{}{}", self.endpoint, kind.path());

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("{kind} catalog transport"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("{kind} catalog HTTP {status}: {text}");
        }

        response
            .json()
            .await
            .with_context(|| format!("{kind} catalog parse"))
    }
}

#[async_trait(?Send)]
impl CatalogSource for HttpBackend {
    async fn fetch_cakes(&self) -> Result<Vec<CakeRecord>> {
        self.get_catalog(CatalogKind::Cakes).await
    }

    async fn fetch_sizes(&self) -> Result<Vec<SizeRecord>> {
        self.get_catalog(CatalogKind::Sizes).await
    }

    async fn fetch_flavors(&self) -> Result<Vec<FlavorRecord>> {
        self.get_catalog(CatalogKind::Flavors).await
    }

    async fn fetch_toppings(&self) -> Result<Vec<ToppingRecord>> {
        self.get_catalog(CatalogKind::Toppings).await
    }

    async fn fetch_colors(&self) -> Result<Vec<ColorRecord>> {
        self.get_catalog(CatalogKind::Colors).await
    }
}

#[async_trait(?Send)]
impl EstimateSink for HttpBackend {
    async fn save_estimate(&self, request: &EstimateRequest) -> Result<EstimateReceipt> {
        let url = format!("{}{}", self.endpoint, ESTIMATES_PATH);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .context("save estimate transport")?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("estimate rejected by backend: HTTP {status}");
            anyhow::bail!("save estimate HTTP {status}: {text}");
        }

        let receipt = parse_receipt(&text);
        info!(estimate_id = ?receipt.estimate_id, total = %request.total_price, "estimate saved");
        Ok(receipt)
    }
}

/// Loads every catalog kind concurrently, each falling back independently.
pub async fn load_catalog<S: CatalogSource + ?Sized>(source: &S) -> Catalog {
    let (cakes, sizes, flavors, toppings, colors) = tokio::join!(
        load_cakes(source),
        load_sizes(source),
        load_flavors(source),
        load_toppings(source),
        load_colors(source),
    );
    Catalog {
        cakes: cakes.items,
        sizes: sizes.items,
        flavors: flavors.items,
        toppings: toppings.items,
        colors: colors.items,
    }
}

/// A native calculator session: the configured pricing policy, the loaded
/// catalog and the backend estimates are saved through.
pub struct Session {
    pub calculator: Calculator,
    pub catalog: Catalog,
    pub backend: HttpBackend,
}

impl Session {
    pub async fn from_config(config: &CalculatorConfig) -> Self {
        let backend = HttpBackend::from_config(config);
        let catalog = load_catalog(&backend).await;
        info!(
            endpoint = backend.endpoint(),
            policy = %config.pricing_policy,
            "calculator session ready"
        );
        Self {
            calculator: Calculator::with_kind(config.pricing_policy),
            catalog,
            backend,
        }
    }

    /// Reads `CRUMBEAR_API_URL` and `CRUMBEAR_PRICING_POLICY`.
    pub async fn from_env() -> Result<Self, ConfigError> {
        let config = CalculatorConfig::from_env()?;
        Ok(Self::from_config(&config).await)
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.calculator.submit(&self.backend).await
    }
}
