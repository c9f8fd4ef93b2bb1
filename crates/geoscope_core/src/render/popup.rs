//! Popup and display-name rules for rendered features

use crate::types::Properties;
use serde::{Deserialize, Serialize};

/// Rules for naming features and summarising their properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupSettings {
    /// Property keys tried in order for a display name.
    pub name_keys: Vec<String>,
    /// Display name used when no name key has a value.
    pub placeholder: String,
    /// Values whose stringified length reaches this many characters are left
    /// out of the popup. Length is counted in Unicode scalar values, so a
    /// CJK character or an emoji counts once.
    pub max_value_len: usize,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            name_keys: ["name", "Name", "NAME", "名称"]
                .into_iter()
                .map(String::from)
                .collect(),
            placeholder: "(unnamed)".to_string(),
            max_value_len: 100,
        }
    }
}

impl PopupSettings {
    /// Picks the first name key with a present value.
    pub fn display_name(&self, properties: &Properties) -> String {
        self.name_keys
            .iter()
            .filter_map(|key| properties.get(key))
            .find(|v| v.is_truthy())
            .map(|v| v.to_string())
            .unwrap_or_else(|| self.placeholder.clone())
    }
}

/// The summary shown when a rendered feature is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    /// `(key, value)` rows in property order.
    pub rows: Vec<(String, String)>,
}

impl Popup {
    pub fn for_properties(properties: &Properties, settings: &PopupSettings) -> Self {
        let rows = properties
            .iter()
            .filter(|(key, value)| !key.eq_ignore_ascii_case("name") && value.is_truthy())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .filter(|(_, value)| value.chars().count() < settings.max_value_len)
            .collect();

        Self {
            title: settings.display_name(properties),
            rows,
        }
    }
}
