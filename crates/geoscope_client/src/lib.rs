//! Layer client for the GeoScope backend.
//!
//! This crate fetches what the query core works on: the layer catalogue,
//! GeoJSON feature collections and raster imagery descriptors. The
//! [`LayerSource`] trait is the seam between the loader and the transport;
//! [`HttpLayerSource`] is the reqwest-backed implementation.

mod error;
mod http;
mod loader;
mod source;

pub use error::ClientError;
pub use http::HttpLayerSource;
pub use loader::LayerLoader;
pub use source::LayerSource;
