//! HTTP API client.
//!
//! `FetchBackend` implements the catalog and estimate seams on top of the
//! browser `fetch` (via `gloo-net`). Paths are relative to the configured
//! API URL; an empty URL means same origin.

use anyhow::{Context, Result};
use async_trait::async_trait;
use cb_api_types::{
    CakeRecord, ColorRecord, EstimateReceipt, EstimateRequest, FlavorRecord, SizeRecord,
    ToppingRecord,
};
use cb_catalog_client::{CatalogKind, CatalogSource, ESTIMATES_PATH, EstimateSink, parse_receipt};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

pub struct FetchBackend {
    base_url: String,
}

impl FetchBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_catalog<T: DeserializeOwned>(&self, kind: CatalogKind) -> Result<Vec<T>> {
        let resp = Request::get(&self.url(kind.path()))
            .send()
            .await
            .with_context(|| format!("fetch error: {kind}"))?;

        if !resp.ok() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("{} {}: {}", resp.status(), resp.status_text(), text);
        }

        resp.json::<Vec<T>>()
            .await
            .with_context(|| format!("JSON parse error: {kind}"))
    }
}

#[async_trait(?Send)]
impl CatalogSource for FetchBackend {
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
impl EstimateSink for FetchBackend {
    async fn save_estimate(&self, request: &EstimateRequest) -> Result<EstimateReceipt> {
        let resp = Request::post(&self.url(ESTIMATES_PATH))
            .json(request)
            .context("encode estimate")?
            .send()
            .await
            .context("fetch error: estimates")?;

        let text = resp.text().await.unwrap_or_default();
        if !resp.ok() {
            anyhow::bail!("{} {}: {}", resp.status(), resp.status_text(), text);
        }

        Ok(parse_receipt(&text))
    }
}
