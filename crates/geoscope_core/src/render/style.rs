//! Styling for rendered features and the box-select rectangle

use serde::{Deserialize, Serialize};

/// Visual class of a rendered feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emphasis {
    /// Plain layer display, no query active.
    Base,
    /// Part of the current query result.
    Matched,
    /// Not part of the current query result.
    Dimmed,
}

/// Stroke and fill for lines, polygons and the selection rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    pub fill_opacity: f64,
}

/// Circle marker used for point geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: String,
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

/// Path and marker styles for one visual class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    pub path: PathStyle,
    pub marker: MarkerStyle,
}

/// The style a single rendered feature is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureStyle {
    Path(PathStyle),
    Marker(MarkerStyle),
}

/// Every style the renderer and the box-select gesture draw with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub base: StyleSet,
    pub matched: StyleSet,
    pub dimmed: StyleSet,
    pub selection: PathStyle,
}

impl Palette {
    pub fn styles(&self, emphasis: Emphasis) -> &StyleSet {
        match emphasis {
            Emphasis::Base => &self.base,
            Emphasis::Matched => &self.matched,
            Emphasis::Dimmed => &self.dimmed,
        }
    }
}

const WHITE: &str = "#fff";

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: StyleSet {
                path: PathStyle {
                    color: "#3388ff".to_string(),
                    weight: 2.0,
                    fill_color: None,
                    fill_opacity: 0.2,
                },
                marker: MarkerStyle {
                    radius: 6.0,
                    fill_color: "#ff5722".to_string(),
                    color: WHITE.to_string(),
                    weight: 1.0,
                    fill_opacity: 0.9,
                },
            },
            matched: StyleSet {
                path: PathStyle {
                    color: "#ff0000".to_string(),
                    weight: 3.0,
                    fill_color: None,
                    fill_opacity: 0.5,
                },
                marker: MarkerStyle {
                    radius: 8.0,
                    fill_color: "#ff0000".to_string(),
                    color: WHITE.to_string(),
                    weight: 2.0,
                    fill_opacity: 1.0,
                },
            },
            dimmed: StyleSet {
                path: PathStyle {
                    color: "#3388ff".to_string(),
                    weight: 1.0,
                    fill_color: None,
                    fill_opacity: 0.1,
                },
                marker: MarkerStyle {
                    radius: 5.0,
                    fill_color: "#999".to_string(),
                    color: WHITE.to_string(),
                    weight: 1.0,
                    fill_opacity: 0.5,
                },
            },
            selection: PathStyle {
                color: "#ffaa00".to_string(),
                weight: 2.0,
                fill_color: Some("#ffbb33".to_string()),
                fill_opacity: 0.2,
            },
        }
    }
}
