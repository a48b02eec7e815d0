//! HTTP transport for a paired accessory bridge
//!
//! Speaks the JSON accessory surface of a bridge that has already been
//! paired, or of a session proxy terminating the secure channel. No
//! retry logic lives here; failures surface to the caller immediately.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::client::{AccessoryClient, RawAccessory, WriteEntry};
use crate::error::{Result, SkylightError};

/// HTTP client for an accessory bridge
pub struct HttpAccessoryClient {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct AccessoriesBody {
    accessories: Vec<RawAccessory>,
}

#[derive(Serialize)]
struct CharacteristicsWriteBody {
    characteristics: Vec<WriteEntry>,
}

impl HttpAccessoryClient {
    /// Create a new HTTP client for the bridge at `base_url`
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(format!("skylight/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkylightError::connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Build URL for a bridge endpoint
    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SkylightError::connection(format!("invalid URL path {path}: {e}")))
    }

    /// Map non-success statuses to typed errors
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, "bridge returned an error response");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SkylightError::connection(
                format!("access denied ({status}): is the bridge session established?"),
            ),
            StatusCode::NOT_FOUND => SkylightError::protocol("endpoint not found on bridge"),
            s if s.is_server_error() => {
                SkylightError::connection(format!("bridge error {status}: {body}"))
            }
            _ => SkylightError::protocol(format!("HTTP error {status}: {body}")),
        })
    }
}

#[async_trait]
impl AccessoryClient for HttpAccessoryClient {
    async fn accessories(&self) -> Result<Vec<RawAccessory>> {
        let url = self.build_url("/accessories")?;
        debug!(%url, "fetching accessories");

        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;

        let body: AccessoriesBody = response.json().await?;
        debug!(count = body.accessories.len(), "accessory listing complete");

        Ok(body.accessories)
    }

    async fn write_characteristics(&self, writes: Vec<WriteEntry>) -> Result<()> {
        let url = self.build_url("/characteristics")?;
        debug!(%url, count = writes.len(), "writing characteristics");

        let body = CharacteristicsWriteBody {
            characteristics: writes,
        };
        let response = self.client.put(url).json(&body).send().await?;
        Self::check_status(response).await?;

        Ok(())
    }
}
