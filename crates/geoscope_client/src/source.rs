//! The transport seam used by [`LayerLoader`](crate::LayerLoader).

use crate::error::ClientError;
use async_trait::async_trait;
use geoscope_core::{FeatureCollection, ImageryDescriptor, LayerInfo};

/// Anything that can serve layers by name.
#[async_trait]
pub trait LayerSource: Send + Sync {
    /// Returns the layer catalogue, in backend order.
    async fn list_layers(&self) -> Result<Vec<LayerInfo>, ClientError>;

    /// Fetches `name` as a GeoJSON feature collection.
    ///
    /// Fails when the layer does not exist or is not a vector layer.
    async fn fetch_geojson(&self, name: &str) -> Result<FeatureCollection, ClientError>;

    /// Fetches the imagery descriptor for raster layer `name`.
    async fn fetch_imagery(&self, name: &str) -> Result<ImageryDescriptor, ClientError>;
}
