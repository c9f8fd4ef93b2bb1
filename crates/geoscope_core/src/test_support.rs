//! A `MapSurface` that records every call, for unit tests.

use crate::layer::ImageryDescriptor;
use crate::render::{PathStyle, RenderedFeature, ResultPanel};
use crate::surface::{Cursor, MapSurface};
use crate::types::{BoundingBox, Feature};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceCall {
    ClearLayers,
    DrawFeatures(usize),
    DrawImageOverlay(String),
    FitBounds(BoundingBox),
    DrawSelection(BoundingBox),
    RemoveSelection,
    SetPanning(bool),
    SetCursor(Cursor),
    SetHint(bool),
    ShowPanel(ResultPanel),
    ShowStats(String),
    Notify(String),
}

#[derive(Debug)]
pub(crate) struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub drawn: Vec<RenderedFeature>,
    pub overlay: Option<ImageryDescriptor>,
    pub viewport: Option<BoundingBox>,
    pub selection: Option<BoundingBox>,
    pub panning: bool,
    pub cursor: Cursor,
    pub hint_visible: bool,
    pub panel: ResultPanel,
    pub stats: String,
    pub notices: Vec<String>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
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
}

impl MapSurface for RecordingSurface {
    fn clear_layers(&mut self) {
        self.calls.push(SurfaceCall::ClearLayers);
        self.drawn.clear();
        self.overlay = None;
    }

    fn draw_features(&mut self, _features: &[Feature], rendered: &[RenderedFeature]) {
        self.calls.push(SurfaceCall::DrawFeatures(rendered.len()));
        self.drawn.extend_from_slice(rendered);
    }

    fn draw_image_overlay(&mut self, imagery: &ImageryDescriptor) {
        self.calls.push(SurfaceCall::DrawImageOverlay(imagery.url.clone()));
        self.overlay = Some(imagery.clone());
    }

    fn fit_bounds(&mut self, bounds: &BoundingBox) {
        self.calls.push(SurfaceCall::FitBounds(*bounds));
        self.viewport = Some(*bounds);
    }

    fn draw_selection(&mut self, bounds: &BoundingBox, _style: &PathStyle) {
        self.calls.push(SurfaceCall::DrawSelection(*bounds));
        self.selection = Some(*bounds);
    }

    fn remove_selection(&mut self) {
        self.calls.push(SurfaceCall::RemoveSelection);
        self.selection = None;
    }

    fn set_panning(&mut self, enabled: bool) {
        self.calls.push(SurfaceCall::SetPanning(enabled));
        self.panning = enabled;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.calls.push(SurfaceCall::SetCursor(cursor));
        self.cursor = cursor;
    }

    fn set_hint_visible(&mut self, visible: bool) {
        self.calls.push(SurfaceCall::SetHint(visible));
        self.hint_visible = visible;
    }

    fn show_panel(&mut self, panel: &ResultPanel) {
        self.calls.push(SurfaceCall::ShowPanel(panel.clone()));
        self.panel = panel.clone();
    }

    fn show_stats(&mut self, text: &str) {
        self.calls.push(SurfaceCall::ShowStats(text.to_string()));
        self.stats = text.to_string();
    }

    fn notify(&mut self, message: &str) {
        self.calls.push(SurfaceCall::Notify(message.to_string()));
        self.notices.push(message.to_string());
    }
}
