//! Layer loading with vector-to-raster fallback.

use crate::error::ClientError;
use crate::source::LayerSource;
use geoscope_core::{LayerData, LayerInfo};
use tracing::{debug, info, warn};

/// Loads layers from a [`LayerSource`].
///
/// A layer is first requested as GeoJSON. Any failure there, including a
/// body that is not a feature collection, falls back to an imagery request.
#[derive(Debug, Clone)]
pub struct LayerLoader<S> {
    source: S,
}

impl<S: LayerSource> LayerLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The layer catalogue.
    pub async fn catalogue(&self) -> Result<Vec<LayerInfo>, ClientError> {
        let layers = self.source.list_layers().await?;
        info!(count = layers.len(), "layer catalogue loaded");
        Ok(layers)
    }

    /// Downloads `name` as vector data, or as raster imagery if that fails.
    pub async fn load(&self, name: &str) -> Result<LayerData, ClientError> {
        let vector = match self.source.fetch_geojson(name).await {
            Ok(collection) => {
                info!(layer = name, features = collection.len(), "vector layer downloaded");
                return Ok(LayerData::Vector(collection));
            }
            Err(e) => e,
        };
        debug!(layer = name, reason = %vector, "not a vector layer, trying imagery");

        match self.source.fetch_imagery(name).await {
            Ok(imagery) => {
                info!(layer = name, url = %imagery.url, "raster layer resolved");
                Ok(LayerData::Raster(imagery))
            }
            Err(raster) => {
                warn!(layer = name, %vector, %raster, "failed to load layer");
                Err(ClientError::LayerUnavailable {
                    name: name.to_string(),
                    vector: Box::new(vector),
                    raster: Box::new(raster),
                })
            }
        }
    }
}
