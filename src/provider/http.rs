//! JSON-over-HTTP source provider.
//!
//! Issues `GET {endpoint}?lat=..&lon=..&radius_km=..` and expects a JSON array
//! of [`ContextRecord`]s, or an object wrapping one under `records`.

use crate::error::ProviderError;
use crate::provider::SourceProvider;
use crate::types::{ContextRecord, GeoQuery, SourceName};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsPayload {
    Bare(Vec<ContextRecord>),
    Wrapped { records: Vec<ContextRecord> },
}

impl RecordsPayload {
    fn into_records(self) -> Vec<ContextRecord> {
        match self {
            RecordsPayload::Bare(records) => records,
            RecordsPayload::Wrapped { records } => records,
        }
    }
}

fn map_http_error(error: reqwest::Error) -> ProviderError {
    if let Some(status) = error.status() {
        match status.as_u16() {
            401 | 403 => ProviderError::AuthFailed(format!("Authentication failed: {}", error)),
            429 => ProviderError::RateLimited(format!("Rate limit exceeded: {}", error)),
            _ => ProviderError::RequestFailed(format!(
                "Request failed with status {}: {}",
                status, error
            )),
        }
    } else if error.is_timeout() {
        ProviderError::RequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ProviderError::RequestFailed(format!("Connection error: {}", error))
    } else if error.is_decode() {
        ProviderError::Decode(error.to_string())
    } else {
        ProviderError::Other(format!("HTTP error: {}", error))
    }
}

fn build_source_http_client(request_timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT.min(request_timeout))
        .timeout(request_timeout)
        .build()
        .map_err(|e| ProviderError::Other(format!("Failed to create HTTP client: {}", e)))
}

/// Provider backed by a remote JSON endpoint
pub struct HttpSourceProvider {
    name: SourceName,
    client: Client,
    endpoint: String,
}

impl HttpSourceProvider {
    pub fn new(
        name: SourceName,
        endpoint: String,
        request_timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let client =
            build_source_http_client(request_timeout.unwrap_or(PROVIDER_HTTP_REQUEST_TIMEOUT))?;
        Ok(Self {
            name,
            client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SourceProvider for HttpSourceProvider {
    fn name(&self) -> &SourceName {
        &self.name
    }

    async fn fetch(&self, query: &GeoQuery) -> Result<Vec<ContextRecord>, ProviderError> {
        let center = query.center();
        debug!(
            source = %self.name,
            endpoint = %self.endpoint,
            lat = center.lat,
            lon = center.lon,
            radius_km = query.radius_km(),
            "Querying HTTP source"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("lat", center.lat.to_string()),
                ("lon", center.lon.to_string()),
                ("radius_km", query.radius_km().to_string()),
            ])
            .send()
            .await
            .map_err(map_http_error)?
            .error_for_status()
            .map_err(map_http_error)?;

        let payload: RecordsPayload = response.json().await.map_err(map_http_error)?;
        Ok(payload.into_records())
    }
}
