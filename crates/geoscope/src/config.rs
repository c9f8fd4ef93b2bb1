//! Configuration management for the GeoScope viewer.
//!
//! This module handles loading and validation of the viewer configuration
//! from TOML files. Command-line overrides are applied by the application.

use geoscope_core::{BoundingBox, KeywordAliases, MatchMode, Palette, PopupSettings, ResultRenderer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

fn default_timeout_secs() -> u64 {
    30
}

fn default_fit_padding() -> u32 {
    20
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Layer backend connection settings
    #[serde(default)]
    pub backend: BackendSettings,
    /// Initial map view
    #[serde(default)]
    pub map: MapSettings,
    /// Styles and popup rules
    #[serde(default)]
    pub render: RenderSettings,
    /// Keyword search defaults
    #[serde(default)]
    pub search: SearchSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the layer backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL the `/api/...` endpoints are resolved against
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The view shown before any layer is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSettings {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    /// Padding in pixels applied around every viewport fit
    #[serde(default = "default_fit_padding")]
    pub fit_padding: u32,
}

impl Default for MapSettings {
    /// Central Wuhan.
    fn default() -> Self {
        Self {
            min_lon: 113.8,
            min_lat: 29.9,
            max_lon: 114.7,
            max_lat: 31.0,
            fit_padding: default_fit_padding(),
        }
    }
}

impl MapSettings {
    pub fn initial_view(&self) -> BoundingBox {
        BoundingBox::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub popup: PopupSettings,
}

impl RenderSettings {
    pub fn renderer(&self) -> ResultRenderer {
        ResultRenderer::new(self.palette.clone(), self.popup.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Match mode used when `--mode` is not given
    #[serde(default)]
    pub default_mode: MatchMode,
    /// Keyword aliases applied in `contains` mode
    #[serde(default)]
    pub aliases: KeywordAliases,
}

/// Logging configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at
    /// the specified path and returns the default configuration.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.backend.base_url.trim();
        let host = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        match host {
            Some(rest) if !rest.is_empty() => {}
            _ => {
                return Err(format!(
                    "Invalid backend URL: {} (expected http:// or https://)",
                    &self.backend.base_url
                ))
            }
        }

        if self.backend.timeout_secs == 0 {
            return Err("backend.timeout_secs must be greater than 0".to_string());
        }

        let view = &self.map;
        if ![view.min_lon, view.min_lat, view.max_lon, view.max_lat]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err("Map view bounds must be finite numbers".to_string());
        }
        if view.min_lon >= view.max_lon {
            return Err("Map min_lon must be less than max_lon".to_string());
        }
        if view.min_lat >= view.max_lat {
            return Err("Map min_lat must be less than max_lat".to_string());
        }
        if view.min_lat < -90.0 || view.max_lat > 90.0 {
            return Err("Map latitudes must lie within [-90, 90]".to_string());
        }

        if self.render.popup.name_keys.is_empty() {
            return Err("render.popup.name_keys cannot be empty".to_string());
        }
        if self.render.popup.max_value_len == 0 {
            return Err("render.popup.max_value_len must be greater than 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}
