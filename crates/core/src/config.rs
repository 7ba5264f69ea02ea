use std::path::PathBuf;

use crate::errors::CoreError;
use crate::models::snapshot::ReferenceBasis;
use crate::retry::RetryPolicy;

/// Identifier used when no backend canister id is configured.
pub const DEFAULT_CANISTER_ID: &str = "default_canister_id";

pub const LOCAL_HOST: &str = "http://localhost:8000";
pub const REMOTE_HOST: &str = "https://ic0.app";

/// Default number of quote requests in flight during enrichment.
pub const DEFAULT_QUOTE_CONCURRENCY: usize = 4;

/// Where the backend lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Local replica on `http://localhost:8000`
    Local,
    /// Public network on `https://ic0.app`
    Ic,
}

impl Network {
    /// `"local"` selects the local replica; anything else the public network.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("local") {
            Network::Local
        } else {
            Network::Ic
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            Network::Local => LOCAL_HOST,
            Network::Ic => REMOTE_HOST,
        }
    }
}

/// Runtime configuration, sourced from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub canister_id: String,
    pub network: Network,
    /// Alpha Vantage key; the provider is only registered when set
    pub alphavantage_api_key: Option<String>,
    /// Directory of the local fallback store
    pub data_dir: PathBuf,
    pub quote_concurrency: usize,
    pub reference_basis: ReferenceBasis,
    pub init_retry: RetryPolicy,
    pub fetch_retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canister_id: DEFAULT_CANISTER_ID.to_string(),
            network: Network::Ic,
            alphavantage_api_key: None,
            data_dir: PathBuf::from(".portfolio"),
            quote_concurrency: DEFAULT_QUOTE_CONCURRENCY,
            reference_basis: ReferenceBasis::PreviousClose,
            init_retry: RetryPolicy::initialization(),
            fetch_retry: RetryPolicy::fetch(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(id) = get("CANISTER_ID_BACKEND").or_else(|| get("VITE_CANISTER_ID_BACKEND")) {
            config.canister_id = id.trim().to_string();
        }
        if let Some(network) = get("DFX_NETWORK").or_else(|| get("VITE_DFX_NETWORK")) {
            config.network = Network::from_name(&network);
        }
        config.alphavantage_api_key = get("ALPHAVANTAGE_API_KEY");
        if let Some(dir) = get("PORTFOLIO_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get("PORTFOLIO_QUOTE_CONCURRENCY") {
            let limit: usize = raw.trim().parse().map_err(|_| {
                CoreError::ValidationError(format!(
                    "PORTFOLIO_QUOTE_CONCURRENCY must be a positive integer, got '{raw}'"
                ))
            })?;
            if limit == 0 {
                return Err(CoreError::ValidationError(
                    "PORTFOLIO_QUOTE_CONCURRENCY must be at least 1".into(),
                ));
            }
            config.quote_concurrency = limit;
        }
        if let Some(raw) = get("PORTFOLIO_REFERENCE_BASIS") {
            config.reference_basis = match raw.trim().to_lowercase().as_str() {
                "previous_close" => ReferenceBasis::PreviousClose,
                "purchase_price" => ReferenceBasis::PurchasePrice,
                other => {
                    return Err(CoreError::ValidationError(format!(
                        "PORTFOLIO_REFERENCE_BASIS must be 'previous_close' or 'purchase_price', got '{other}'"
                    )))
                }
            };
        }

        Ok(config)
    }

    pub fn host(&self) -> &'static str {
        self.network.host()
    }

    /// `true` when no canister id was configured.
    pub fn uses_default_canister(&self) -> bool {
        self.canister_id == DEFAULT_CANISTER_ID
    }
}
