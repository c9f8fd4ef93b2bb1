//! A terminal stand-in for the map widget.
//!
//! `ConsoleSurface` keeps the state a map page would show (drawn features,
//! viewport, result panel, statistics) and reports changes through tracing.
//! The application prints the panel and statistics to stdout after a query.

use geoscope_core::{
    BoundingBox, Cursor, Emphasis, Feature, ImageryDescriptor, MapSurface, PathStyle,
    RenderedFeature, ResultPanel,
};
use tracing::{debug, info, trace, warn};

#[derive(Debug)]
pub struct ConsoleSurface {
    fit_padding: u32,
    drawn: Vec<RenderedFeature>,
    overlay: Option<String>,
    viewport: Option<BoundingBox>,
    selection: Option<BoundingBox>,
    panning: bool,
    cursor: Cursor,
    hint_visible: bool,
    panel: ResultPanel,
    stats: String,
    notices: Vec<String>,
}

impl ConsoleSurface {
    pub fn new(fit_padding: u32) -> Self {
        Self {
            fit_padding,
            drawn: Vec::new(),
            overlay: None,
            viewport: None,
            selection: None,
            panning: true,
            cursor: Cursor::Default,
            hint_visible: false,
            panel: ResultPanel::Idle,
            stats: String::new(),
            notices: Vec::new(),
        }
    }

    pub fn drawn(&self) -> &[RenderedFeature] {
        &self.drawn
    }

    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    pub fn viewport(&self) -> Option<&BoundingBox> {
        self.viewport.as_ref()
    }

    pub fn panel(&self) -> &ResultPanel {
        &self.panel
    }

    pub fn stats(&self) -> &str {
        &self.stats
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The selection rectangle currently drawn, if any.
    pub fn selection(&self) -> Option<&BoundingBox> {
        self.selection.as_ref()
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// Matched features followed by their popup rows.
    pub fn result_details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for feature in self.drawn.iter().filter(|f| f.emphasis == Emphasis::Matched) {
            lines.push(format!("#{} {}", feature.index, feature.popup.title));
            for (key, value) in &feature.popup.rows {
                lines.push(format!("    {}: {}", key, value));
            }
        }
        lines
    }
}

impl MapSurface for ConsoleSurface {
    fn clear_layers(&mut self) {
        trace!("map cleared");
        self.drawn.clear();
        self.overlay = None;
    }

    fn draw_features(&mut self, _features: &[Feature], rendered: &[RenderedFeature]) {
        let count = |emphasis: Emphasis| rendered.iter().filter(|f| f.emphasis == emphasis).count();
        info!(
            base = count(Emphasis::Base),
            matched = count(Emphasis::Matched),
            dimmed = count(Emphasis::Dimmed),
            "features drawn"
        );
        self.drawn.extend_from_slice(rendered);
    }

    fn draw_image_overlay(&mut self, imagery: &ImageryDescriptor) {
        info!(url = %imagery.url, extent = %imagery.extent(), "image overlay placed");
        self.overlay = Some(imagery.url.clone());
    }

    fn fit_bounds(&mut self, bounds: &BoundingBox) {
        info!(%bounds, padding = self.fit_padding, "viewport fitted");
        self.viewport = Some(*bounds);
    }

    fn draw_selection(&mut self, bounds: &BoundingBox, _style: &PathStyle) {
        debug!(%bounds, "selection rectangle drawn");
        self.selection = Some(*bounds);
    }

    fn remove_selection(&mut self) {
        self.selection = None;
    }

    fn set_panning(&mut self, enabled: bool) {
        debug!(enabled, "map panning");
        self.panning = enabled;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_hint_visible(&mut self, visible: bool) {
        if visible {
            info!("Drag on the map to draw a selection box");
        }
        self.hint_visible = visible;
    }

    fn show_panel(&mut self, panel: &ResultPanel) {
        self.panel = panel.clone();
    }

    fn show_stats(&mut self, text: &str) {
        debug!(stats = text, "statistics updated");
        self.stats = text.to_string();
    }

    fn notify(&mut self, message: &str) {
        warn!("⚠️ {}", message);
        self.notices.push(message.to_string());
    }
}
