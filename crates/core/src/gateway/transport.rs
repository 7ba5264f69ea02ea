use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::config::{AppConfig, Network};
use crate::errors::CoreError;
use crate::models::http::{HttpRequest, HttpResponse};

/// The single call shape the backend exposes: one request envelope in,
/// one response envelope out.
///
/// Everything the core needs from the backend goes through this trait, so a
/// different transport (agent SDK, test double) replaces only this one piece.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    async fn http_request(&self, request: HttpRequest) -> Result<HttpResponse, CoreError>;
}

/// Maps the envelope onto a plain HTTP call through the network's boundary node.
///
/// - Local replica: `http://localhost:8000<url>?canisterId=<id>`
/// - Public network: `https://<id>.ic0.app<url>`
pub struct HttpTransport {
    client: Client,
    canister_id: String,
    network: Network,
    host: String,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CoreError::Initialization(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            canister_id: config.canister_id.clone(),
            network: config.network,
            host: config.host().to_string(),
        })
    }

    /// Absolute URL for a backend path such as `/api/assets`.
    pub fn url_for(&self, path: &str) -> String {
        match self.network {
            Network::Local => {
                let sep = if path.contains('?') { '&' } else { '?' };
                format!("{}{path}{sep}canisterId={}", self.host, self.canister_id)
            }
            Network::Ic => {
                let domain = self
                    .host
                    .trim_start_matches("https://")
                    .trim_start_matches("http://");
                format!("https://{}.{domain}{path}", self.canister_id)
            }
        }
    }
}

#[async_trait]
impl BackendTransport for HttpTransport {
    async fn http_request(&self, request: HttpRequest) -> Result<HttpResponse, CoreError> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            CoreError::ValidationError(format!("Invalid HTTP method '{}'", request.method))
        })?;

        let mut builder = self.client.request(method, self.url_for(&request.url));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let resp = builder.send().await?;
        let status_code = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = resp.bytes().await?.to_vec();

        Ok(HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}
