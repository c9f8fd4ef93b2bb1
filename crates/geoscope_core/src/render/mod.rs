//! Render plans for the map and the result panel
//!
//! The renderer never touches a display. It turns a feature collection (and
//! optionally a [`QueryResult`]) into a [`RenderPlan`]: one styled, labelled
//! entry per feature, the region to fit the viewport to, and the content of
//! the side panel. A [`MapSurface`](crate::surface::MapSurface) draws it.

mod popup;
mod style;

pub use popup::{Popup, PopupSettings};
pub use style::{Emphasis, FeatureStyle, MarkerStyle, Palette, PathStyle, StyleSet};

use crate::query::QueryResult;
use crate::spatial::{extent_of, is_fit_region};
use crate::types::{BoundingBox, Feature};

/// One feature as it should appear on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    /// Index into the layer's feature collection.
    pub index: usize,
    pub emphasis: Emphasis,
    pub style: FeatureStyle,
    pub popup: Popup,
}

/// Content of the side panel listing query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    /// No query has run since the layer was selected or results were cleared.
    Idle,
    /// A query ran and matched nothing.
    NoResults,
    /// Display names of every result, in collection order.
    Results(Vec<String>),
}

impl ResultPanel {
    /// Panel content as plain text lines.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Idle => vec!["No query executed".to_string()],
            Self::NoResults => vec!["No matching features".to_string()],
            Self::Results(names) => {
                let mut lines = Vec::with_capacity(names.len() + 1);
                lines.push(format!("Found {} results:", names.len()));
                lines.extend(names.iter().cloned());
                lines
            }
        }
    }
}

/// Everything needed to redraw the layer after a load or a query.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub features: Vec<RenderedFeature>,
    /// Region to fit the viewport to, when it is a usable region.
    pub fit: Option<BoundingBox>,
    pub panel: ResultPanel,
}

impl RenderPlan {
    /// Features drawn with the given emphasis.
    pub fn with_emphasis(&self, emphasis: Emphasis) -> impl Iterator<Item = &RenderedFeature> {
        self.features.iter().filter(move |f| f.emphasis == emphasis)
    }
}

/// Builds render plans from a palette and popup rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRenderer {
    palette: Palette,
    popup: PopupSettings,
}

impl ResultRenderer {
    pub fn new(palette: Palette, popup: PopupSettings) -> Self {
        Self { palette, popup }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn popup_settings(&self) -> &PopupSettings {
        &self.popup
    }

    /// Plain display of a freshly loaded layer, fitted to the whole layer.
    pub fn render_layer(&self, features: &[Feature]) -> RenderPlan {
        let rendered = features
            .iter()
            .enumerate()
            .map(|(i, f)| self.render_feature(i, f, Emphasis::Base))
            .collect();

        RenderPlan {
            features: rendered,
            fit: fit_region(features.iter()),
            panel: ResultPanel::Idle,
        }
    }

    /// Redraws every feature, emphasising the members of `result`.
    ///
    /// Every feature lands in exactly one of `Matched` or `Dimmed`. The
    /// viewport fit covers the result set only.
    pub fn render_result(&self, features: &[Feature], result: &QueryResult) -> RenderPlan {
        let rendered = features
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let emphasis = if result.contains(i) {
                    Emphasis::Matched
                } else {
                    Emphasis::Dimmed
                };
                self.render_feature(i, f, emphasis)
            })
            .collect();

        let panel = if result.is_empty() {
            ResultPanel::NoResults
        } else {
            ResultPanel::Results(
                result
                    .features(features)
                    .map(|f| self.popup.display_name(&f.properties))
                    .collect(),
            )
        };

        RenderPlan {
            features: rendered,
            fit: fit_region(result.features(features)),
            panel,
        }
    }

    fn render_feature(&self, index: usize, feature: &Feature, emphasis: Emphasis) -> RenderedFeature {
        let styles = self.palette.styles(emphasis);
        let style = if feature.geometry.is_puntal() {
            FeatureStyle::Marker(styles.marker.clone())
        } else {
            FeatureStyle::Path(styles.path.clone())
        };

        RenderedFeature {
            index,
            emphasis,
            style,
            popup: Popup::for_properties(&feature.properties, &self.popup),
        }
    }
}

fn fit_region<'a>(features: impl Iterator<Item = &'a Feature>) -> Option<BoundingBox> {
    extent_of(features.map(|f| &f.geometry)).filter(is_fit_region)
}
