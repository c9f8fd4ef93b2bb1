//! Command-line interface handling for the GeoScope viewer.
//!
//! This module provides command-line argument parsing using the `clap`
//! crate. Every query option maps onto one user action in the map session.

use clap::{Arg, ArgMatches, Command};
use geoscope_core::{LonLat, MatchMode};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
///
/// Settings options override the configuration file; the remaining options
/// describe what to load and which query to run.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for the backend base URL
    pub base_url: Option<String>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Print the layer catalogue
    pub list_layers: bool,
    /// Layer to load from the backend
    pub layer: Option<String>,
    /// Local GeoJSON file to load instead of a backend layer
    pub geojson: Option<PathBuf>,
    /// Keyword to search for
    pub keyword: Option<String>,
    /// Keyword match mode; the configured default when absent
    pub mode: Option<MatchMode>,
    /// Box-select corners, as `min_lon,min_lat,max_lon,max_lat` in any order
    pub bbox: Option<(LonLat, LonLat)>,
    /// Print popup details for every result
    pub details: bool,
}

impl CliArgs {
    /// Parses command line arguments using clap.
    ///
    /// Malformed `--mode` or `--bbox` values are reported by clap and end the
    /// process, like any other usage error.
    pub fn parse() -> Self {
        Self::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parses an explicit argument list, returning clap's error instead of
    /// exiting.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&Self::command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("geoscope.toml")),
            base_url: matches.get_one::<String>("base-url").cloned(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            list_layers: matches.get_flag("list-layers"),
            layer: matches.get_one::<String>("layer").cloned(),
            geojson: matches.get_one::<PathBuf>("geojson").cloned(),
            keyword: matches.get_one::<String>("keyword").cloned(),
            mode: matches.get_one::<MatchMode>("mode").copied(),
            bbox: matches.get_one::<(LonLat, LonLat)>("bbox").copied(),
            details: matches.get_flag("details"),
        }
    }

    fn command() -> Command {
        Command::new("GeoScope")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Query point-of-interest layers by keyword or bounding box")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .value_parser(clap::value_parser!(PathBuf))
                    .default_value("geoscope.toml"),
            )
            .arg(
                Arg::new("base-url")
                    .short('u')
                    .long("base-url")
                    .value_name("URL")
                    .help("Layer backend base URL (e.g., http://127.0.0.1:5000)"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("list-layers")
                    .long("list-layers")
                    .help("Print the backend's layer catalogue")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("layer")
                    .short('L')
                    .long("layer")
                    .value_name("NAME")
                    .help("Layer to load from the backend")
                    .conflicts_with("geojson"),
            )
            .arg(
                Arg::new("geojson")
                    .short('f')
                    .long("geojson")
                    .value_name("FILE")
                    .help("Load a local GeoJSON FeatureCollection instead of a backend layer")
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("keyword")
                    .short('k')
                    .long("keyword")
                    .value_name("TEXT")
                    .help("Find features with a property value matching TEXT"),
            )
            .arg(
                Arg::new("mode")
                    .short('m')
                    .long("mode")
                    .value_name("MODE")
                    .help("Keyword match mode (exact, contains)")
                    .value_parser(|s: &str| s.parse::<MatchMode>().map_err(|e| e.to_string())),
            )
            .arg(
                Arg::new("bbox")
                    .short('b')
                    .long("bbox")
                    .value_name("MIN_LON,MIN_LAT,MAX_LON,MAX_LAT")
                    .help("Find features inside a box, drawn as a box-select gesture")
                    .allow_hyphen_values(true)
                    .value_parser(parse_bbox),
            )
            .arg(
                Arg::new("details")
                    .short('d')
                    .long("details")
                    .help("Print the popup properties of every result")
                    .action(clap::ArgAction::SetTrue),
            )
    }
}

/// Parses `lon,lat,lon,lat` into the two corners of a box-select drag.
pub fn parse_bbox(s: &str) -> Result<(LonLat, LonLat), String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        &[lon_a, lat_a, lon_b, lat_b] => {
            if values.iter().any(|v| !v.is_finite()) {
                return Err("bounding box values must be finite".to_string());
            }
            Ok((LonLat::new(lon_a, lat_a), LonLat::new(lon_b, lat_b)))
        }
        _ => Err(format!("expected 4 comma-separated numbers, got {}", values.len())),
    }
}
