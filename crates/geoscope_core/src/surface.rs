//! The display seam between the query core and a concrete map widget.
//!
//! [`MapSession`](crate::session::MapSession) drives a `MapSurface` for every
//! visible side effect: drawing features, overlays and the selection
//! rectangle, moving the viewport, toggling panning and the hint banner, and
//! updating the result panel and statistics readout.

use crate::layer::ImageryDescriptor;
use crate::render::{PathStyle, RenderedFeature, ResultPanel};
use crate::types::{BoundingBox, Feature};

/// Mouse cursor shown over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    Default,
    Crosshair,
}

/// A map display plus the page elements around it.
pub trait MapSurface {
    /// Removes every drawn feature and any image overlay.
    fn clear_layers(&mut self);

    /// Draws `rendered` features; each entry indexes into `features`.
    fn draw_features(&mut self, features: &[Feature], rendered: &[RenderedFeature]);

    /// Places a raster image overlay.
    fn draw_image_overlay(&mut self, imagery: &ImageryDescriptor);

    /// Moves the viewport to show `bounds`.
    fn fit_bounds(&mut self, bounds: &BoundingBox);

    /// Draws the box-select rectangle, replacing any previous one.
    fn draw_selection(&mut self, bounds: &BoundingBox, style: &PathStyle);

    /// Removes the box-select rectangle if one is drawn.
    fn remove_selection(&mut self);

    fn set_panning(&mut self, enabled: bool);

    fn set_cursor(&mut self, cursor: Cursor);

    fn set_hint_visible(&mut self, visible: bool);

    fn show_panel(&mut self, panel: &ResultPanel);

    fn show_stats(&mut self, text: &str);

    /// Shows a user-facing message, such as a refused action.
    fn notify(&mut self, message: &str);
}
