//! Map rendering surface.
//!
//! The composer never talks to a concrete mapping library. It drives a
//! [`MapSurface`], and [`MapScene`] is the surface that records what was
//! asked of it so it can later be emitted as a Leaflet page or inspected.

use serde::Serialize;

use crate::legend::Legend;
use crate::marker::MarkerLayer;

/// A geographic point, latitude first as Leaflet expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::str::FromStr for LatLng {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(format!(
                "center requires 2 values (lat,lon), got {}",
                parts.len()
            ));
        }

        let vals: Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse::<f64>()).collect();
        let vals = vals.map_err(|e| format!("invalid number in center: {e}"))?;

        if !(-90.0..=90.0).contains(&vals[0]) {
            return Err(format!("latitude {} out of range [-90, 90]", vals[0]));
        }
        if !(-180.0..=180.0).contains(&vals[1]) {
            return Err(format!("longitude {} out of range [-180, 180]", vals[1]));
        }

        Ok(Self::new(vals[0], vals[1]))
    }
}

/// Screen corner a control is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    TopRight,
    BottomRight,
}

impl Position {
    /// Leaflet position keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopRight => "topright",
            Self::BottomRight => "bottomright",
        }
    }
}

/// A raster tile base layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Display name in the layer switcher
    pub name: String,
    /// URL template with `{id}`, `{z}`, `{x}`, `{y}` and `{accessToken}`
    pub url_template: String,
    /// Provider style id substituted for `{id}`
    pub style_id: String,
    pub access_token: String,
    pub attribution: String,
    pub max_zoom: u8,
}

/// Anything that can be added to the map as a layer.
#[derive(Debug, Clone)]
pub enum Layer {
    Tile(TileLayer),
    Markers(MarkerLayer),
}

impl Layer {
    /// Name shown in the layer switcher.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tile(tile) => &tile.name,
            Self::Markers(markers) => &markers.name,
        }
    }
}

/// Handle returned by [`MapSurface::add_layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

/// Toggle panel for base layers and overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSwitcher {
    pub base_layers: Vec<LayerId>,
    pub overlays: Vec<LayerId>,
    pub collapsed: bool,
    pub position: Position,
}

/// Anything that can be pinned on top of the map.
#[derive(Debug, Clone)]
pub enum Control {
    Legend { legend: Legend, position: Position },
    LayerSwitcher(LayerSwitcher),
}

/// Capabilities the composer needs from a mapping backend.
pub trait MapSurface {
    /// Center the viewport.
    fn set_view(&mut self, center: LatLng, zoom: u8);

    /// Add a layer. `active` layers are shown on first render.
    fn add_layer(&mut self, layer: Layer, active: bool) -> LayerId;

    /// Pin a control to the map.
    fn add_control(&mut self, control: Control);
}

/// A layer as recorded by [`MapScene`].
#[derive(Debug, Clone)]
pub struct SceneLayer {
    pub id: LayerId,
    pub layer: Layer,
    pub active: bool,
}

/// Surface that records the composed map.
#[derive(Debug, Clone, Default)]
pub struct MapScene {
    pub view: Option<(LatLng, u8)>,
    pub layers: Vec<SceneLayer>,
    pub controls: Vec<Control>,
}

impl MapScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The marker overlay, if one was added.
    #[must_use]
    pub fn marker_layer(&self) -> Option<&MarkerLayer> {
        self.layers.iter().find_map(|l| match &l.layer {
            Layer::Markers(markers) => Some(markers),
            Layer::Tile(_) => None,
        })
    }

    /// The legend control, if one was added.
    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.controls.iter().find_map(|c| match c {
            Control::Legend { legend, .. } => Some(legend),
            Control::LayerSwitcher(_) => None,
        })
    }

    /// The layer switcher, if one was added.
    #[must_use]
    pub fn layer_switcher(&self) -> Option<&LayerSwitcher> {
        self.controls.iter().find_map(|c| match c {
            Control::LayerSwitcher(switcher) => Some(switcher),
            Control::Legend { .. } => None,
        })
    }
}

impl MapSurface for MapScene {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn add_layer(&mut self, layer: Layer, active: bool) -> LayerId {
        let id = LayerId(self.layers.len());
        self.layers.push(SceneLayer { id, layer, active });
        id
    }

    fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_parse() {
        let center: LatLng = "37.09,-95.71".parse().unwrap();
        assert!((center.lat - 37.09).abs() < 0.001);
        assert!((center.lng - (-95.71)).abs() < 0.001);
    }

    #[test]
    fn test_center_parse_rejects_bad_input() {
        assert!("37.09".parse::<LatLng>().is_err());
        assert!("95.0,10.0".parse::<LatLng>().is_err());
        assert!("10.0,east".parse::<LatLng>().is_err());
    }

    #[test]
    fn test_scene_assigns_sequential_ids() {
        let mut scene = MapScene::new();
        let a = scene.add_layer(Layer::Markers(MarkerLayer::new("A", Vec::new())), true);
        let b = scene.add_layer(Layer::Markers(MarkerLayer::new("B", Vec::new())), false);

        assert_eq!(a, LayerId(0));
        assert_eq!(b, LayerId(1));
        assert!(scene.layers[0].active);
        assert!(!scene.layers[1].active);
        assert_eq!(scene.layers[1].id, b);
        assert_eq!(scene.layers[1].layer.name(), "B");
    }

    #[test]
    fn test_scene_records_view() {
        let mut scene = MapScene::new();
        assert!(scene.view.is_none());
        scene.set_view(LatLng::new(1.0, 2.0), 7);
        assert_eq!(scene.view, Some((LatLng::new(1.0, 2.0), 7)));
    }
}
