//! # GeoScope Core
//!
//! The query core of a point-of-interest map viewer: it holds the active
//! GeoJSON layer, answers keyword and bounding-box queries against it, and
//! decides how every feature should be drawn afterwards.
//!
//! ## Core Features
//!
//! - **Layer Store**: one active layer at a time, guarded by selection
//!   tickets so late downloads never overwrite a newer selection
//! - **Spatial Predicates**: per-geometry intersection tests against an
//!   axis-aligned box, including multi-geometries and polygon outer rings
//! - **Queries**: case-insensitive keyword search (`exact` or `contains`)
//!   and range search over the downloaded collection, timed per pass
//! - **Rendering**: styled, popup-labelled render plans plus the panel and
//!   statistics text shown next to the map
//! - **Box Select**: a one-shot pointer gesture producing a normalized box
//!
//! ## Architecture Overview
//!
//! Nothing in this crate draws pixels or performs I/O. A [`MapSession`] owns
//! all state and drives an implementation of [`MapSurface`] for every
//! visible effect; downloading layers is left to the caller, which hands the
//! result back through [`MapSession::apply_layer`].
//!
//! ## Quick Start Example
//!
//! ```rust,ignore
//! use geoscope_core::*;
//!
//! let mut session = MapSession::new(my_surface, ResultRenderer::default(), KeywordAliases::default());
//! let ticket = session.select_layer("public_services");
//! let collection = FeatureCollection::from_json_str(&body)?;
//! session.apply_layer(&ticket, LayerData::Vector(collection))?;
//!
//! let result = session.search_keyword("博物馆", MatchMode::Contains)?;
//! println!("{}", format_stats(&result));
//! ```

pub mod error;
pub mod interaction;
pub mod layer;
pub mod query;
pub mod render;
pub mod session;
pub mod spatial;
pub mod surface;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::QueryError;
pub use interaction::{BoxSelectController, GestureState};
pub use layer::{ImageryDescriptor, LayerData, LayerInfo, LayerStore, SelectionTicket};
pub use query::{
    format_stats, keyword_query, loading_text, range_query, KeywordAliases, KeywordMatcher,
    MatchMode, QueryKind, QueryResult, IDLE_STATS,
};
pub use render::{
    Emphasis, FeatureStyle, MarkerStyle, Palette, PathStyle, Popup, PopupSettings, RenderPlan,
    RenderedFeature, ResultPanel, ResultRenderer, StyleSet,
};
pub use session::MapSession;
pub use spatial::{extent_of, intersects, is_fit_region};
pub use surface::{Cursor, MapSurface};
pub use types::{BoundingBox, Feature, FeatureCollection, Geometry, LonLat, Properties, PropertyValue};
