use cb_pricing::{PolicyParseError, PricingPolicyKind};
use thiserror::Error;

/// Empty means the host decides: same origin in the browser, the native
/// HTTP backend's own default elsewhere.
pub const DEFAULT_API_URL: &str = "";

pub const ENV_PREFIX: &str = "CRUMBEAR_";

/// `api_url` -> `CRUMBEAR_API_URL`.
pub fn env_var_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_ascii_uppercase())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid pricing_policy: {0}")]
    PricingPolicy(#[from] PolicyParseError),
}

/// Runtime settings for a calculator page.
///
/// Keys are `api_url` and `pricing_policy`. Native hosts read them from
/// `CRUMBEAR_API_URL` / `CRUMBEAR_PRICING_POLICY`; the browser reads
/// `data-api-url` / `data-pricing-policy` from the calculator root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorConfig {
    /// Prefix for `/api/...` paths. Empty means same origin.
    pub api_url: String,
    pub pricing_policy: PricingPolicyKind,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            pricing_policy: PricingPolicyKind::default(),
        }
    }
}

impl CalculatorConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("api_url")
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        let pricing_policy = match lookup("pricing_policy") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => PricingPolicyKind::default(),
        };

        Ok(Self {
            api_url,
            pricing_policy,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(env_var_name(key)).ok())
    }
}
