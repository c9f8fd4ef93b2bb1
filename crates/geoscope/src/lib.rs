//! # GeoScope - Command-Line Entry Point
//!
//! Loads a point-of-interest layer from the layer backend (or a local GeoJSON
//! file) and runs keyword or box-select queries against it, printing the
//! result panel and query statistics.
//!
//! ## Quick Start
//!
//! ```bash
//! # List the backend's layers
//! geoscope --list-layers
//!
//! # Keyword search on a backend layer
//! geoscope --layer public_services --keyword 博物馆
//!
//! # Exact match against a local file, with popup details
//! geoscope --geojson pois.geojson --keyword 高等院校 --mode exact --details
//!
//! # Box select
//! geoscope --layer metro_station --bbox 114.30,30.50,114.40,30.60
//! ```
//!
//! ## Configuration
//!
//! Settings are read from a TOML file (default: `geoscope.toml`). If the file
//! doesn't exist, a default configuration will be created.

use tracing::error;

mod app;
mod cli;
mod config;
mod console;
mod logging;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the GeoScope viewer.
///
/// # Exit Codes
///
/// * **0**: All requested actions succeeded
/// * **1**: Error during startup, configuration, layer loading or a refused query
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();

    let mut logging = config.logging.clone();
    if let Some(level) = &args.log_level {
        logging.level = level.clone();
    }
    if let Err(e) = logging::setup_logging(&logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use config::{BackendSettings, LoggingSettings, MapSettings, RenderSettings, SearchSettings};
pub use console::ConsoleSurface;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render.renderer(), geoscope_core::ResultRenderer::default());
    }

    #[test]
    fn test_cli_args_from_command_line() {
        let args = CliArgs::try_parse_from([
            "geoscope",
            "--config",
            "test.toml",
            "--base-url",
            "http://10.0.0.5:5000",
            "--json-logs",
            "--list-layers",
            "--layer",
            "metro_station",
            "--bbox",
            "114.4,30.6,114.3,30.5",
            "--details",
        ])
        .unwrap();

        assert_eq!(args.config_path, PathBuf::from("test.toml"));
        assert_eq!(args.base_url.as_deref(), Some("http://10.0.0.5:5000"));
        assert_eq!(args.layer.as_deref(), Some("metro_station"));
        assert!(args.json_logs && args.list_layers && args.details);
        assert!(args.geojson.is_none() && args.keyword.is_none() && args.mode.is_none());
        assert_eq!(
            args.bbox,
            Some((
                geoscope_core::LonLat::new(114.4, 30.6),
                geoscope_core::LonLat::new(114.3, 30.5)
            ))
        );

        let defaults = CliArgs::try_parse_from(["geoscope"]).unwrap();
        assert_eq!(defaults.config_path, PathBuf::from("geoscope.toml"));
        assert!(defaults.log_level.is_none());
        assert!(CliArgs::try_parse_from(["geoscope", "--bbox", "1,2,3"]).is_err());
    }

    #[tokio::test]
    async fn test_override_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geoscope.toml");
        let mut config = AppConfig::load_from_file(&path).await.unwrap();

        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
