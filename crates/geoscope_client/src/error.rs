//! Error types for the layer client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Imagery descriptor for '{0}' is missing url or bounds")]
    IncompleteImagery(String),

    #[error("Layer '{name}' is neither a vector layer ({vector}) nor a raster layer ({raster})")]
    LayerUnavailable {
        name: String,
        vector: Box<ClientError>,
        raster: Box<ClientError>,
    },
}
