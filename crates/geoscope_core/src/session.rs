//! The map session: single owner of the application state.
//!
//! A [`MapSession`] owns the layer store, the box-select gesture, the
//! renderer configuration, the last query result and the [`MapSurface`] it
//! draws on. Every user action goes through one `&mut self` method, which
//! keeps "one active layer, one gesture" true without any global state.
//!
//! Refused actions are reported twice: as a notice on the surface (what the
//! user sees) and as a typed [`QueryError`] (what the caller handles).

use crate::error::QueryError;
use crate::interaction::{BoxSelectController, GestureState};
use crate::layer::{LayerData, LayerStore, SelectionTicket};
use crate::query::{
    format_stats, loading_text, range_query, KeywordAliases, KeywordMatcher, MatchMode, QueryKind,
    QueryResult, IDLE_STATS,
};
use crate::render::{ResultPanel, ResultRenderer};
use crate::surface::MapSurface;
use crate::types::LonLat;
use tracing::{info, warn};

pub struct MapSession<S> {
    store: LayerStore,
    gesture: BoxSelectController,
    renderer: ResultRenderer,
    aliases: KeywordAliases,
    surface: S,
    last_result: Option<QueryResult>,
}

impl<S: MapSurface> MapSession<S> {
    pub fn new(surface: S, renderer: ResultRenderer, aliases: KeywordAliases) -> Self {
        let gesture = BoxSelectController::new(renderer.palette().selection.clone());
        Self {
            store: LayerStore::new(),
            gesture,
            renderer,
            aliases,
            surface,
            last_result: None,
        }
    }

    // ------------------------------------------------------------------
    // Layer selection
    // ------------------------------------------------------------------

    /// Makes `name` the active layer and wipes the map and the results.
    ///
    /// Hand the returned ticket back to [`apply_layer`](Self::apply_layer)
    /// or [`fail_layer`](Self::fail_layer) once the download settles.
    pub fn select_layer(&mut self, name: &str) -> SelectionTicket {
        self.surface.clear_layers();
        self.reset_results();
        self.store.select(name)
    }

    /// Installs downloaded layer data and draws it.
    ///
    /// Data for a ticket that is no longer current is discarded with
    /// [`QueryError::StaleSelection`] and the map is left alone.
    pub fn apply_layer(&mut self, ticket: &SelectionTicket, data: LayerData) -> Result<(), QueryError> {
        let data = self.store.fulfil(ticket, data)?;
        info!(layer = ticket.name(), kind = data.kind(), "layer loaded");

        match data {
            LayerData::Vector(collection) => {
                let plan = self.renderer.render_layer(&collection.features);
                self.surface.draw_features(&collection.features, &plan.features);
                if let Some(fit) = plan.fit {
                    self.surface.fit_bounds(&fit);
                }
            }
            LayerData::Raster(imagery) => {
                self.surface.draw_image_overlay(imagery);
                self.surface.fit_bounds(&imagery.extent());
            }
        }
        Ok(())
    }

    /// Records that the download for `ticket` failed. The map stays as it is.
    pub fn fail_layer(&mut self, ticket: &SelectionTicket, reason: &str) {
        if self.store.is_current(ticket) {
            warn!(layer = ticket.name(), reason, "layer failed to load");
        } else {
            warn!(layer = ticket.name(), reason, "stale layer failure ignored");
        }
    }

    /// Deselects the active layer ("no layer").
    pub fn clear_layer(&mut self) {
        self.store.clear();
        self.surface.clear_layers();
        self.reset_results();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Runs a keyword query against the active vector layer.
    pub fn search_keyword(&mut self, keyword: &str, mode: MatchMode) -> Result<QueryResult, QueryError> {
        let matcher = match KeywordMatcher::with_aliases(keyword, mode, &self.aliases) {
            Ok(matcher) => matcher,
            Err(e) => return Err(refuse(&mut self.surface, e)),
        };
        let features = match self.store.features() {
            Ok(features) => features,
            Err(e) => return Err(refuse(&mut self.surface, e)),
        };

        self.surface.show_stats(&loading_text(QueryKind::Keyword));
        let result = matcher.run(features);
        Ok(self.present(result))
    }

    /// Enters box-select mode. Requires a selected layer.
    pub fn start_box_select(&mut self) -> Result<(), QueryError> {
        let layer_active = self.store.active_name().is_some();
        match self.gesture.activate(layer_active, &mut self.surface) {
            Ok(()) => Ok(()),
            Err(e) => Err(refuse(&mut self.surface, e)),
        }
    }

    pub fn pointer_down(&mut self, at: LonLat) {
        self.gesture.pointer_down(at, &mut self.surface);
    }

    pub fn pointer_move(&mut self, at: LonLat) {
        self.gesture.pointer_move(at, &mut self.surface);
    }

    /// Finishes the box-select gesture and runs the range query.
    ///
    /// `Ok(None)` means the gesture ended without a rectangle.
    pub fn pointer_up(&mut self, at: LonLat) -> Result<Option<QueryResult>, QueryError> {
        let Some(bbox) = self.gesture.pointer_up(at, &mut self.surface) else {
            return Ok(None);
        };
        let features = match self.store.features() {
            Ok(features) => features,
            Err(e) => return Err(refuse(&mut self.surface, e)),
        };

        self.surface.show_stats(&loading_text(QueryKind::Range));
        let result = range_query(features, &bbox);
        Ok(Some(self.present(result)))
    }

    /// Drops the current result and redraws the layer without highlighting.
    pub fn clear_results(&mut self) {
        self.reset_results();
        if let Ok(features) = self.store.features() {
            let plan = self.renderer.render_layer(features);
            self.surface.clear_layers();
            self.surface.draw_features(features, &plan.features);
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn last_result(&self) -> Option<&QueryResult> {
        self.last_result.as_ref()
    }

    pub fn renderer(&self) -> &ResultRenderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consumes the session, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn reset_results(&mut self) {
        self.last_result = None;
        self.surface.show_panel(&ResultPanel::Idle);
        self.surface.show_stats(IDLE_STATS);
    }

    /// Shows `result` on the surface and remembers it.
    fn present(&mut self, result: QueryResult) -> QueryResult {
        self.surface.show_stats(&format_stats(&result));
        info!(
            kind = result.kind().label(),
            count = result.count(),
            elapsed_ms = result.elapsed_ms(),
            "query finished"
        );

        if let Ok(features) = self.store.features() {
            let plan = self.renderer.render_result(features, &result);
            self.surface.clear_layers();
            self.surface.draw_features(features, &plan.features);
            if let Some(fit) = plan.fit {
                self.surface.fit_bounds(&fit);
            }
            self.surface.show_panel(&plan.panel);
        }

        self.last_result = Some(result.clone());
        result
    }
}

fn refuse<S: MapSurface + ?Sized>(surface: &mut S, error: QueryError) -> QueryError {
    surface.notify(&error.to_string());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::ImageryDescriptor;
    use crate::render::Emphasis;
    use crate::test_support::{RecordingSurface, SurfaceCall};
    use crate::types::{BoundingBox, Feature, FeatureCollection, Properties};

    fn session() -> MapSession<RecordingSurface> {
        MapSession::new(
            RecordingSurface::default(),
            ResultRenderer::default(),
            KeywordAliases::default(),
        )
    }

    fn poi(lon: f64, lat: f64, name: &str, kind: &str) -> Feature {
        Feature::point(lon, lat, [("name", name), ("type", kind)].into_iter().collect())
    }

    fn wuhan() -> LayerData {
        LayerData::Vector(FeatureCollection::new(vec![
            poi(114.36, 30.54, "武汉大学", "高等院校"),
            poi(114.41, 30.51, "华中科技大学", "高等院校"),
            poi(114.35, 30.58, "湖北省博物馆", "博物馆"),
            poi(114.31, 30.54, "黄鹤楼", "风景名胜"),
        ]))
    }

    fn loaded() -> MapSession<RecordingSurface> {
        let mut s = session();
        let ticket = s.select_layer("public_services");
        s.apply_layer(&ticket, wuhan()).unwrap();
        s
    }

    #[test]
    fn test_layer_load_draws_base_style() {
        let s = loaded();
        assert_eq!(s.surface().drawn.len(), 4);
        assert!(s.surface().drawn.iter().all(|f| f.emphasis == Emphasis::Base));
        assert_eq!(
            s.surface().viewport,
            Some(BoundingBox::new(114.31, 30.51, 114.41, 30.58))
        );
        assert_eq!(s.surface().stats, IDLE_STATS);
    }

    #[test]
    fn test_keyword_search_highlights_results() {
        let mut s = loaded();
        let result = s.search_keyword("学校", MatchMode::Contains).unwrap();
        assert_eq!(result.indices(), &[0, 1]);

        let surface = s.surface();
        assert_eq!(
            surface.panel,
            ResultPanel::Results(vec!["武汉大学".to_string(), "华中科技大学".to_string()])
        );
        assert!(surface.stats.starts_with("Keyword query | 2 results | "));
        let matched = surface.drawn.iter().filter(|f| f.emphasis == Emphasis::Matched).count();
        let dimmed = surface.drawn.iter().filter(|f| f.emphasis == Emphasis::Dimmed).count();
        assert_eq!((matched, dimmed), (2, 2));
        assert_eq!(s.last_result(), Some(&result));
    }

    #[test]
    fn test_keyword_search_with_no_match() {
        let mut s = loaded();
        let result = s.search_keyword("学校", MatchMode::Exact).unwrap();
        assert!(result.is_empty());
        assert_eq!(s.surface().panel, ResultPanel::NoResults);
    }

    #[test]
    fn test_empty_keyword_is_refused_before_layer_check() {
        let mut s = session();
        assert_eq!(s.search_keyword("  ", MatchMode::Contains), Err(QueryError::EmptyKeyword));
        assert_eq!(s.surface().notices, [QueryError::EmptyKeyword.to_string()]);
    }

    #[test]
    fn test_keyword_search_without_layer_is_refused() {
        let mut s = session();
        assert_eq!(
            s.search_keyword("博物馆", MatchMode::Contains),
            Err(QueryError::NoActiveLayer)
        );
        assert_eq!(s.surface().notices.len(), 1);
        assert!(s.last_result().is_none());
    }

    #[test]
    fn test_keyword_search_on_raster_layer_is_refused() {
        let mut s = session();
        let ticket = s.select_layer("dem");
        s.apply_layer(
            &ticket,
            LayerData::Raster(ImageryDescriptor {
                url: "/static/dem.png".to_string(),
                bounds: [[29.9, 113.8], [31.0, 114.7]],
            }),
        )
        .unwrap();
        assert_eq!(s.surface().overlay.as_ref().map(|o| o.url.as_str()), Some("/static/dem.png"));
        assert_eq!(
            s.search_keyword("x", MatchMode::Contains),
            Err(QueryError::NotVectorLayer("dem".to_string()))
        );
    }

    #[test]
    fn test_box_select_without_layer_is_refused() {
        let mut s = session();
        assert_eq!(s.start_box_select(), Err(QueryError::NoActiveLayer));
        assert_eq!(s.gesture_state(), GestureState::Inactive);
        assert!(s.surface().selection.is_none());
        assert!(s.surface().panning);
        assert_eq!(s.surface().notices, [QueryError::NoActiveLayer.to_string()]);
        assert!(!s
            .surface()
            .calls
            .iter()
            .any(|c| matches!(c, SurfaceCall::DrawSelection(_) | SurfaceCall::SetPanning(_))));
    }

    #[test]
    fn test_box_select_runs_range_query() {
        let mut s = loaded();
        s.start_box_select().unwrap();
        assert_eq!(s.gesture_state(), GestureState::Armed);

        s.pointer_down(LonLat::new(114.30, 30.50));
        s.pointer_move(LonLat::new(114.38, 30.57));
        let result = s.pointer_up(LonLat::new(114.40, 30.60)).unwrap().unwrap();

        // 114.41 lies east of the box; the museum and the tower are inside.
        assert_eq!(result.indices(), &[0, 2, 3]);
        assert_eq!(result.kind(), QueryKind::Range);
        assert_eq!(s.gesture_state(), GestureState::Inactive);
        assert!(s.surface().stats.starts_with("Range query | 3 results | "));
        assert!(s.surface().panning);
        assert!(!s.surface().hint_visible);
    }

    #[test]
    fn test_box_select_on_unloaded_layer_refuses_at_release() {
        let mut s = session();
        s.select_layer("metro_line");
        s.start_box_select().unwrap();
        s.pointer_down(LonLat::new(0.0, 0.0));
        s.pointer_move(LonLat::new(1.0, 1.0));
        assert_eq!(
            s.pointer_up(LonLat::new(1.0, 1.0)),
            Err(QueryError::NotVectorLayer("metro_line".to_string()))
        );
        assert_eq!(s.gesture_state(), GestureState::Inactive);
    }

    #[test]
    fn test_stale_layer_response_is_discarded() {
        let mut s = session();
        let slow = s.select_layer("metro_line");
        let fast = s.select_layer("public_services");
        s.apply_layer(&fast, wuhan()).unwrap();

        let late = LayerData::Vector(FeatureCollection::new(vec![Feature::point(
            0.0,
            0.0,
            Properties::new(),
        )]));
        assert!(matches!(
            s.apply_layer(&slow, late),
            Err(QueryError::StaleSelection { .. })
        ));
        assert_eq!(s.store().active_name(), Some("public_services"));
        assert_eq!(s.surface().drawn.len(), 4);
    }

    #[test]
    fn test_selecting_a_layer_resets_results() {
        let mut s = loaded();
        s.search_keyword("博物馆", MatchMode::Contains).unwrap();
        s.select_layer("metro_station");
        assert!(s.last_result().is_none());
        assert_eq!(s.surface().panel, ResultPanel::Idle);
        assert_eq!(s.surface().stats, IDLE_STATS);
        assert!(s.surface().drawn.is_empty());
    }

    #[test]
    fn test_clear_layer_and_clear_results() {
        let mut s = loaded();
        s.search_keyword("博物馆", MatchMode::Contains).unwrap();
        s.clear_results();
        assert!(s.last_result().is_none());
        assert!(s.surface().drawn.iter().all(|f| f.emphasis == Emphasis::Base));

        s.clear_layer();
        assert_eq!(s.store().active_name(), None);
        assert!(s.surface().drawn.is_empty());
    }

    #[test]
    fn test_failed_load_leaves_map_unchanged() {
        let mut s = loaded();
        let calls_before = s.surface().calls.len();
        let ticket = s.store().active_name().map(str::to_string).unwrap();
        let pending = s.select_layer(&ticket);
        let calls_after_select = s.surface().calls.len();
        assert!(calls_after_select > calls_before);

        s.fail_layer(&pending, "connection refused");
        assert_eq!(s.surface().calls.len(), calls_after_select);
    }
}
