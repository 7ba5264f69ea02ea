use thiserror::Error;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Initialization / Configuration ──────────────────────────────
    #[error("Backend initialization failed: {0}")]
    Initialization(String),

    #[error("Backend is not initialized")]
    NotReady,

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status code {actual} (expected {expected})")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("No asset source available")]
    NoSource,

    // ── Encoding ────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Local store ─────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Another {0} request is already in flight")]
    Busy(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl CoreError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Transport, status and decode failures are transient from the client's
    /// point of view. Bad input, cancellation and missing capabilities are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Initialization(_)
            | CoreError::Api { .. }
            | CoreError::Network(_)
            | CoreError::UnexpectedStatus { .. }
            | CoreError::Deserialization(_)
            | CoreError::Storage(_) => true,
            CoreError::NotReady
            | CoreError::NoSource
            | CoreError::Serialization(_)
            | CoreError::ValidationError(_)
            | CoreError::AssetNotFound(_)
            | CoreError::Busy(_)
            | CoreError::Cancelled => false,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, including API keys in the query.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
