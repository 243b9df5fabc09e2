//! Server-side model of the map widget.
//!
//! The browser script reads [`MapView`] as JSON and mirrors it with Leaflet:
//! one tile layer, the current view, and a marker with an open popup per
//! visit. Popup content is plain text; the script sets it with `textContent`.

use serde::Serialize;

use crate::config::MapConfig;
use crate::models::{Coords, VisitType};

pub const POPUP_MAX_WIDTH: u32 = 250;
pub const POPUP_MIN_WIDTH: u32 = 100;
/// Seconds the pan animation takes after a list item is activated. The script
/// animates the live map with it before posting the activation.
pub const PAN_DURATION_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    NotReady,
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::NotReady => write!(f, "map is not initialized"),
        }
    }
}

impl std::error::Error for MapError {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MapStatus {
    /// Waiting for the browser to report a position.
    Pending,
    /// Geolocation failed; the map stays off for this run.
    Unavailable,
    Ready { view: MapViewport },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapViewport {
    pub center: Coords,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanOptions {
    pub animate: bool,
    pub duration: f64,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self {
            animate: true,
            duration: PAN_DURATION_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub content: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub coords: Coords,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    #[serde(flatten)]
    status: MapStatus,
    tiles: TileLayer,
    markers: Vec<Marker>,
    pan: PanOptions,
}

impl MapView {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            status: MapStatus::Pending,
            tiles: TileLayer {
                url: config.tile_url.clone(),
                attribution: config.attribution.clone(),
                max_zoom: config.max_zoom,
            },
            markers: Vec::new(),
            pan: PanOptions::default(),
        }
    }

    /// Create the map centred on `center`. Any markers from an earlier
    /// initialization are dropped.
    pub fn initialize(&mut self, center: Coords, zoom: u8) {
        self.markers.clear();
        self.status = MapStatus::Ready {
            view: MapViewport { center, zoom },
        };
        tracing::info!(%center, zoom, "map initialized");
    }

    pub fn mark_unavailable(&mut self) {
        self.markers.clear();
        self.status = MapStatus::Unavailable;
    }

    pub fn add_marker(
        &mut self,
        coords: Coords,
        visit_type: VisitType,
        description: &str,
    ) -> Result<&Marker, MapError> {
        if !self.is_ready() {
            return Err(MapError::NotReady);
        }

        self.markers.push(Marker {
            coords,
            popup: Popup {
                content: format!("{} {}", visit_type.emoji(), description),
                max_width: POPUP_MAX_WIDTH,
                min_width: POPUP_MIN_WIDTH,
                auto_close: false,
                close_on_click: false,
                class_name: visit_type.popup_class(),
                open: true,
            },
        });

        // just pushed
        Ok(&self.markers[self.markers.len() - 1])
    }

    /// Move the view to `coords`. The browser has already animated the pan by
    /// the time this runs, so the next render starts where it ended.
    pub fn pan_to(&mut self, coords: Coords, zoom: u8) -> Result<(), MapError> {
        let MapStatus::Ready { view } = &mut self.status else {
            return Err(MapError::NotReady);
        };

        view.center = coords;
        view.zoom = zoom;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status, MapStatus::Ready { .. })
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn viewport(&self) -> Option<&MapViewport> {
        match &self.status {
            MapStatus::Ready { view } => Some(view),
            _ => None,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_map() -> MapView {
        let mut map = MapView::new(&MapConfig::default());
        map.initialize(Coords::new(51.5, -0.1), 13);
        map
    }

    #[test]
    fn starts_pending_and_refuses_markers() {
        let mut map = MapView::new(&MapConfig::default());
        assert_eq!(map.status(), &MapStatus::Pending);
        assert_eq!(
            map.add_marker(Coords::new(0.0, 0.0), VisitType::Cafe, "x").unwrap_err(),
            MapError::NotReady
        );
        assert_eq!(map.pan_to(Coords::new(0.0, 0.0), 13), Err(MapError::NotReady));
        assert!(map.markers().is_empty());
    }

    #[test]
    fn marker_popup_is_sticky_and_open() {
        let mut map = ready_map();
        let marker = map
            .add_marker(Coords::new(51.5, -0.1), VisitType::Cafe, "Visit to Blue Bottle on June 15")
            .unwrap();
        assert_eq!(marker.popup.content, "☕️ Visit to Blue Bottle on June 15");
        assert_eq!(marker.popup.max_width, 250);
        assert_eq!(marker.popup.min_width, 100);
        assert!(!marker.popup.auto_close);
        assert!(!marker.popup.close_on_click);
        assert!(marker.popup.open);
        assert_eq!(marker.popup.class_name, "cafe-popup");
    }

    #[test]
    fn pan_moves_view() {
        let mut map = ready_map();
        map.pan_to(Coords::new(48.85, 2.35), 13).unwrap();
        let view = map.viewport().unwrap();
        assert_eq!(view.center, Coords::new(48.85, 2.35));
        assert_eq!(view.zoom, 13);
    }

    #[test]
    fn pan_options_reach_the_script() {
        let json = serde_json::to_value(ready_map()).unwrap();
        assert_eq!(json["pan"]["animate"], true);
        assert_eq!(json["pan"]["duration"], 1.0);
        assert!(json["view"].get("animate").is_none());
    }

    #[test]
    fn popup_content_keeps_markup_as_text() {
        let mut map = ready_map();
        let marker = map
            .add_marker(Coords::new(0.0, 0.0), VisitType::Cafe, "Visit to <img src=x> on June 15")
            .unwrap();
        assert_eq!(marker.popup.content, "☕️ Visit to <img src=x> on June 15");
    }

    #[test]
    fn reinitialize_drops_markers() {
        let mut map = ready_map();
        map.add_marker(Coords::new(0.0, 0.0), VisitType::Park, "p").unwrap();
        map.initialize(Coords::new(1.0, 1.0), 13);
        assert!(map.markers().is_empty());
    }

    #[test]
    fn unavailable_map_serializes_status() {
        let mut map = MapView::new(&MapConfig::default());
        map.mark_unavailable();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["tiles"]["maxZoom"], 19);
    }

    #[test]
    fn ready_map_serializes_view() {
        let map = ready_map();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["view"]["center"][0], 51.5);
        assert_eq!(json["view"]["zoom"], 13);
    }
}
