//! reqwest-backed [`LayerSource`].

use crate::error::ClientError;
use crate::source::LayerSource;
use async_trait::async_trait;
use geoscope_core::{FeatureCollection, ImageryDescriptor, LayerInfo};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace, warn};

const USER_AGENT: &str = concat!("geoscope/", env!("CARGO_PKG_VERSION"));

/// Talks to the layer backend over HTTP.
///
/// Endpoints, relative to the base URL:
///
/// * `GET api/layers` - catalogue, a JSON array of `{name, type}`
/// * `GET api/geojson/{name}` - a `FeatureCollection`; non-200 when `name` is not a vector layer
/// * `GET api/imagery/{name}` - `{url, bounds}` for raster layers
#[derive(Debug, Clone)]
pub struct HttpLayerSource {
    client: Client,
    base: Url,
}

/// Imagery answer before validation; the backend may omit either field.
#[derive(Deserialize)]
struct RawImagery {
    url: Option<String>,
    bounds: Option<[[f64; 2]; 2]>,
}

impl HttpLayerSource {
    /// Creates a source for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(%url, error = %e, "request failed");
            ClientError::Http(format!("Request failed: {}", e))
        })?;

        // Anything but 200 counts as a miss, so the loader can fall back.
        let status = response.status();
        if status != StatusCode::OK {
            warn!(%url, %status, "unexpected status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Http(format!("Failed to read response: {}", e)))?;
        trace!(%url, bytes = body.len(), "response received");

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl LayerSource for HttpLayerSource {
    async fn list_layers(&self) -> Result<Vec<LayerInfo>, ClientError> {
        let url = self.endpoint(&["api", "layers"])?;
        self.get_json(url).await
    }

    async fn fetch_geojson(&self, name: &str) -> Result<FeatureCollection, ClientError> {
        let url = self.endpoint(&["api", "geojson", name])?;
        self.get_json(url).await
    }

    async fn fetch_imagery(&self, name: &str) -> Result<ImageryDescriptor, ClientError> {
        let url = self.endpoint(&["api", "imagery", name])?;
        let raw: RawImagery = self.get_json(url).await?;
        match (raw.url, raw.bounds) {
            (Some(url), Some(bounds)) if !url.is_empty() => Ok(ImageryDescriptor { url, bounds }),
            _ => Err(ClientError::IncompleteImagery(name.to_string())),
        }
    }
}
