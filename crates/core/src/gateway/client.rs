use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::http::{HttpRequest, HttpResponse};

use super::transport::BackendTransport;

pub const ASSETS_PATH: &str = "/api/assets";

/// Status expected from a successful read.
pub const STATUS_OK: u16 = 200;
/// Status expected from a successful create.
pub const STATUS_CREATED: u16 = 201;

/// Typed operations over the backend's request/response envelope.
///
/// Encodes outgoing JSON as bytes, decodes incoming bytes as JSON, and treats
/// any status other than the expected one as a failure.
#[derive(Clone)]
pub struct BackendGateway {
    transport: Arc<dyn BackendTransport>,
}

impl BackendGateway {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    /// `GET /api/assets` → 200 with a JSON array of assets.
    pub async fn list_assets(&self) -> Result<Vec<Asset>, CoreError> {
        let response = self
            .transport
            .http_request(HttpRequest::get(ASSETS_PATH))
            .await?;
        Self::decode(response, STATUS_OK)
    }

    /// `POST /api/assets` with the JSON-encoded asset → 201 with the created asset.
    pub async fn create_asset(&self, asset: &Asset) -> Result<Asset, CoreError> {
        let body = serde_json::to_vec(asset)
            .map_err(|e| CoreError::Serialization(format!("Failed to encode asset: {e}")))?;
        let response = self
            .transport
            .http_request(HttpRequest::post_json(ASSETS_PATH, body))
            .await?;
        Self::decode(response, STATUS_CREATED)
    }

    fn decode<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, CoreError> {
        if response.status_code != expected {
            debug!(
                "Backend answered {} (expected {expected}), body: {}",
                response.status_code,
                String::from_utf8_lossy(&response.body)
            );
            return Err(CoreError::UnexpectedStatus {
                expected,
                actual: response.status_code,
            });
        }
        serde_json::from_slice(&response.body).map_err(|e| {
            CoreError::Deserialization(format!("Failed to decode backend response: {e}"))
        })
    }
}
