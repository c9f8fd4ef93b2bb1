//! Main application logic.
//!
//! The `Application` wires the configuration, the layer loader and a map
//! session over a [`ConsoleSurface`], then replays the command-line request
//! as the user actions a map page would see: pick a layer, search, drag a box.

use crate::{cli::CliArgs, config::AppConfig, console::ConsoleSurface, logging::display_banner};
use geoscope_client::{HttpLayerSource, LayerLoader};
use geoscope_core::{FeatureCollection, LayerData, MapSession, MapSurface, QueryResult};
use std::error::Error;
use std::path::Path;
use tracing::{info, warn};

pub struct Application {
    config: AppConfig,
    args: CliArgs,
    loader: LayerLoader<HttpLayerSource>,
    session: MapSession<ConsoleSurface>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Build the layer loader and the map session
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(base_url) = &args.base_url {
            config.backend.base_url = base_url.clone();
        }

        if let Some(log_level) = &args.log_level {
            config.logging.level = log_level.clone();
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        let source = HttpLayerSource::new(&config.backend.base_url, config.backend.timeout())?;
        let loader = LayerLoader::new(source);

        let mut surface = ConsoleSurface::new(config.map.fit_padding);
        surface.fit_bounds(&config.map.initial_view());
        let session = MapSession::new(
            surface,
            config.render.renderer(),
            config.search.aliases.clone(),
        );

        info!("📡 Backend: {}", config.backend.base_url);

        Ok(Self {
            config,
            args,
            loader,
            session,
        })
    }

    /// Runs the requested actions and prints their results to stdout.
    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        let nothing_requested = !self.args.list_layers
            && self.args.layer.is_none()
            && self.args.geojson.is_none()
            && self.args.keyword.is_none()
            && self.args.bbox.is_none();
        if nothing_requested {
            warn!("Nothing to do: pass --list-layers, --layer or --geojson (see --help)");
            return Ok(());
        }

        self.execute().await?;
        Ok(())
    }

    /// Replays the request against the session.
    ///
    /// Returns the result of the last query run, if any.
    async fn execute(&mut self) -> Result<Option<QueryResult>, Box<dyn Error>> {
        if self.args.list_layers {
            for layer in self.loader.catalogue().await? {
                println!("{}", layer.label());
            }
        }

        if let Some(path) = self.args.geojson.clone() {
            self.load_file(&path).await?;
        } else if let Some(name) = self.args.layer.clone() {
            self.load_remote(&name).await?;
        }

        let mut last = None;

        if let Some(keyword) = self.args.keyword.clone() {
            let mode = self.args.mode.unwrap_or(self.config.search.default_mode);
            let result = self.session.search_keyword(&keyword, mode)?;
            self.print_result();
            last = Some(result);
        }

        if let Some((from, to)) = self.args.bbox {
            self.session.start_box_select()?;
            self.session.pointer_down(from);
            self.session.pointer_move(to);
            if let Some(result) = self.session.pointer_up(to)? {
                self.print_result();
                last = Some(result);
            }
        }

        Ok(last)
    }

    async fn load_remote(&mut self, name: &str) -> Result<(), Box<dyn Error>> {
        let ticket = self.session.select_layer(name);
        match self.loader.load(name).await {
            Ok(data) => {
                self.session.apply_layer(&ticket, data)?;
                Ok(())
            }
            Err(e) => {
                self.session.fail_layer(&ticket, &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Loads a GeoJSON file as if the backend had served it.
    async fn load_file(&mut self, path: &Path) -> Result<(), Box<dyn Error>> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let ticket = self.session.select_layer(&name);

        let parsed = match tokio::fs::read_to_string(path).await {
            Ok(content) => FeatureCollection::from_json_str(&content).map_err(Box::<dyn Error>::from),
            Err(e) => Err(e.into()),
        };

        match parsed {
            Ok(collection) => {
                self.session.apply_layer(&ticket, LayerData::Vector(collection))?;
                Ok(())
            }
            Err(e) => {
                self.session.fail_layer(&ticket, &e.to_string());
                Err(format!("Failed to load {}: {}", path.display(), e).into())
            }
        }
    }

    fn print_result(&self) {
        let surface = self.session.surface();
        for line in surface.panel().lines() {
            println!("{line}");
        }
        if self.args.details {
            for line in surface.result_details() {
                println!("  {line}");
            }
        }
        println!("{}", surface.stats());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoscope_core::{LonLat, MatchMode, QueryError, QueryKind, ResultPanel};
    use tempfile::TempDir;

    const LAYER: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [114.36, 30.54]},
             "properties": {"name": "武汉大学", "type": "高等院校"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [114.41, 30.51]},
             "properties": {"name": "华中科技大学", "type": "高等院校"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [114.35, 30.58]},
             "properties": {"name": "湖北省博物馆", "type": "博物馆"}},
            {"type": "Feature", "geometry": null, "properties": {"name": "未定位"}}
        ]
    }"#;

    fn args(dir: &TempDir) -> CliArgs {
        CliArgs {
            config_path: dir.path().join("geoscope.toml"),
            base_url: None,
            log_level: None,
            json_logs: false,
            list_layers: false,
            layer: None,
            geojson: None,
            keyword: None,
            mode: None,
            bbox: None,
            details: false,
        }
    }

    async fn with_layer(dir: &TempDir) -> CliArgs {
        let path = dir.path().join("public_services.geojson");
        tokio::fs::write(&path, LAYER).await.unwrap();
        CliArgs {
            geojson: Some(path),
            ..args(dir)
        }
    }

    #[tokio::test]
    async fn test_new_creates_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let app = Application::new(args(&dir)).await.unwrap();
        assert!(dir.path().join("geoscope.toml").exists());
        assert_eq!(
            app.session.surface().viewport(),
            Some(&app.config.map.initial_view())
        );
    }

    #[tokio::test]
    async fn test_invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            base_url: Some("localhost:5000".to_string()),
            ..args(&dir)
        };
        assert!(Application::new(args).await.is_err());
    }

    #[tokio::test]
    async fn test_keyword_search_on_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            keyword: Some("学校".to_string()),
            ..with_layer(&dir).await
        };
        let mut app = Application::new(args).await.unwrap();
        let result = app.execute().await.unwrap().unwrap();

        assert_eq!(result.kind(), QueryKind::Keyword);
        assert_eq!(result.indices(), &[0, 1]);
        assert_eq!(app.session.store().active_name(), Some("public_services"));
        assert_eq!(
            app.session.surface().panel(),
            &ResultPanel::Results(vec!["武汉大学".to_string(), "华中科技大学".to_string()])
        );
    }

    #[tokio::test]
    async fn test_exact_mode_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            keyword: Some("博物馆".to_string()),
            ..with_layer(&dir).await
        };
        let mut app = Application::new(args).await.unwrap();
        app.config.search.default_mode = MatchMode::Exact;
        let result = app.execute().await.unwrap().unwrap();
        assert_eq!(result.indices(), &[2]);
    }

    #[tokio::test]
    async fn test_box_select_on_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            bbox: Some((LonLat::new(114.40, 30.60), LonLat::new(114.30, 30.50))),
            ..with_layer(&dir).await
        };
        let mut app = Application::new(args).await.unwrap();
        let result = app.execute().await.unwrap().unwrap();

        assert_eq!(result.kind(), QueryKind::Range);
        assert_eq!(result.indices(), &[0, 2]);
        assert!(app.session.surface().is_panning());
    }

    #[tokio::test]
    async fn test_query_without_layer_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            keyword: Some("学校".to_string()),
            ..args(&dir)
        };
        let mut app = Application::new(args).await.unwrap();
        let err = app.execute().await.unwrap_err();
        assert_eq!(err.to_string(), QueryError::NoActiveLayer.to_string());
        assert_eq!(app.session.surface().notices(), [QueryError::NoActiveLayer.to_string()]);
    }

    #[tokio::test]
    async fn test_unreadable_file_leaves_map_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.geojson");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let args = CliArgs {
            geojson: Some(path),
            ..args(&dir)
        };
        let mut app = Application::new(args).await.unwrap();
        assert!(app.execute().await.is_err());
        assert!(app.session.surface().drawn().is_empty());
        assert!(app.session.store().data().is_none());
    }
}
