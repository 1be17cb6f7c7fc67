//! Map composition.
//!
//! Lays out the base layers, the earthquake overlay, the legend and the
//! layer switcher on a [`MapSurface`].

use crate::errors::QuakeMapError;
use crate::legend::{BREAKPOINTS, Legend};
use crate::marker::MarkerLayer;
use crate::surface::{Control, LatLng, Layer, LayerSwitcher, MapSurface, Position, TileLayer};

/// Default tile endpoint, templated by style id and access token.
pub const DEFAULT_TILE_URL: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";

/// Highest zoom the tile provider serves.
pub const MAX_ZOOM: u8 = 18;

/// Default viewport center (continental United States).
pub const DEFAULT_CENTER: LatLng = LatLng::new(37.09, -95.71);

pub const DEFAULT_ZOOM: u8 = 5;

const TILE_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, \
     <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, \
     Imagery \u{a9} <a href=\"https://www.mapbox.com/\">Mapbox</a>";

/// A base layer style offered in the switcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseStyle {
    pub name: String,
    pub style_id: String,
}

impl BaseStyle {
    #[must_use]
    pub fn new(name: &str, style_id: &str) -> Self {
        Self {
            name: name.to_string(),
            style_id: style_id.to_string(),
        }
    }
}

/// Viewport and tile configuration.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: u8,
    pub tile_url: String,
    pub access_token: String,
    /// First style is shown on load
    pub base_styles: [BaseStyle; 2],
}

impl MapConfig {
    /// Configuration with the default view and styles.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            access_token: access_token.into(),
            base_styles: [
                BaseStyle::new("Street Map", "mapbox.streets"),
                BaseStyle::new("Dark Map", "mapbox.dark"),
            ],
        }
    }

    /// Check the configuration before composing.
    ///
    /// # Errors
    ///
    /// Returns `Config` for a blank access token, a zoom above [`MAX_ZOOM`],
    /// or a tile template missing `{z}`, `{x}` or `{y}`.
    pub fn validate(&self) -> Result<(), QuakeMapError> {
        if self.access_token.trim().is_empty() {
            return Err(QuakeMapError::Config("tile access token is empty".into()));
        }
        if self.zoom > MAX_ZOOM {
            return Err(QuakeMapError::Config(format!(
                "zoom {} exceeds maximum of {MAX_ZOOM}",
                self.zoom
            )));
        }
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tile_url.contains(placeholder) {
                return Err(QuakeMapError::Config(format!(
                    "tile URL template is missing {placeholder}"
                )));
            }
        }
        Ok(())
    }

    fn tile_layer(&self, style: &BaseStyle) -> TileLayer {
        TileLayer {
            name: style.name.clone(),
            url_template: self.tile_url.clone(),
            style_id: style.style_id.clone(),
            access_token: self.access_token.clone(),
            attribution: TILE_ATTRIBUTION.to_string(),
            max_zoom: MAX_ZOOM,
        }
    }
}

/// Compose the map on `surface`.
///
/// With no overlay (the feed could not be loaded) the base layers, legend
/// and switcher are still added; the switcher then lists base layers only.
///
/// # Errors
///
/// Returns `Config` if [`MapConfig::validate`] rejects `config`; nothing is
/// added to the surface in that case.
pub fn compose<S: MapSurface>(
    surface: &mut S,
    config: &MapConfig,
    overlay: Option<MarkerLayer>,
) -> Result<(), QuakeMapError> {
    config.validate()?;

    let base_layers: Vec<_> = config
        .base_styles
        .iter()
        .enumerate()
        .map(|(i, style)| surface.add_layer(Layer::Tile(config.tile_layer(style)), i == 0))
        .collect();

    let overlays: Vec<_> = overlay
        .into_iter()
        .map(|markers| surface.add_layer(Layer::Markers(markers), true))
        .collect();

    surface.set_view(config.center, config.zoom);

    surface.add_control(Control::Legend {
        legend: Legend::from_breakpoints(&BREAKPOINTS),
        position: Position::BottomRight,
    });

    surface.add_control(Control::LayerSwitcher(LayerSwitcher {
        base_layers,
        overlays,
        collapsed: false,
        position: Position::TopRight,
    }));

    Ok(())
}
