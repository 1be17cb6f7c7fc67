//! Feature-to-marker rendering.
//!
//! Each feed feature becomes one circle marker. Radius and fill follow the
//! magnitude; the popup carries place, magnitude and event time.

use serde::Serialize;

use crate::bucket::ColorBucket;
use crate::models::Feature;
use crate::surface::LatLng;

/// Pixels of radius per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 5.0;

/// Magnitude at which a marker's fill becomes fully opaque.
const OPAQUE_MAGNITUDE: f64 = 5.0;

/// Display name of the overlay in the layer switcher.
pub const OVERLAY_NAME: &str = "Earthquakes";

/// Popup timestamp layout.
const POPUP_TIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S UTC";

/// Circle styling for one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: ColorBucket,
    pub fill_opacity: f64,
    pub stroke_color: &'static str,
    pub stroke_weight: f64,
    pub stroke_opacity: f64,
}

impl MarkerStyle {
    /// Style for a magnitude. Negative magnitudes get a zero radius.
    #[must_use]
    pub fn for_magnitude(magnitude: f64) -> Self {
        Self {
            radius: (magnitude * RADIUS_PER_MAGNITUDE).max(0.0),
            fill_color: ColorBucket::for_magnitude(magnitude),
            fill_opacity: (magnitude / OPAQUE_MAGNITUDE).clamp(0.0, 1.0),
            stroke_color: "Black",
            stroke_weight: 1.0,
            stroke_opacity: 1.0,
        }
    }
}

/// A rendered point symbol for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LatLng,
    #[serde(flatten)]
    pub style: MarkerStyle,
    pub popup: String,
}

impl From<&Feature> for Marker {
    fn from(feature: &Feature) -> Self {
        // Missing magnitudes style like zero.
        let magnitude = feature.properties.mag.unwrap_or(0.0);

        Self {
            position: LatLng::new(feature.latitude(), feature.longitude()),
            style: MarkerStyle::for_magnitude(magnitude),
            popup: popup_html(feature),
        }
    }
}

/// The marker overlay: markers in feed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl MarkerLayer {
    #[must_use]
    pub fn new(name: impl Into<String>, markers: Vec<Marker>) -> Self {
        Self {
            name: name.into(),
            markers,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Convert features into the marker overlay, one marker per feature.
#[must_use]
pub fn render_markers(features: &[Feature]) -> MarkerLayer {
    let markers = features.iter().map(Marker::from).collect();
    MarkerLayer::new(OVERLAY_NAME, markers)
}

/// Build the popup body for a feature.
#[must_use]
pub fn popup_html(feature: &Feature) -> String {
    let place = feature
        .properties
        .place
        .as_deref()
        .map_or_else(|| "Unknown location".to_string(), escape_html);

    let magnitude = feature
        .properties
        .mag
        .map_or_else(|| "unknown".to_string(), |m| m.to_string());

    let time = feature
        .time()
        .map_or_else(|| "unknown time".to_string(), |t| t.format(POPUP_TIME_FORMAT).to_string());

    format!("<h3>{place}</h3><hr><h3>Magnitude: {magnitude}</h3><hr><p>{time}</p>")
}

/// Escape text for inclusion in HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureCollection;
    use crate::models::tests::{SAMPLE_FEED, feature};

    #[test]
    fn test_single_feature_scenario() {
        let features = vec![feature(
            "10km NE of Town",
            Some(4.5),
            1_700_000_000_000,
            -120.5,
            37.0,
        )];

        let layer = render_markers(&features);
        assert_eq!(layer.len(), 1);

        let marker = &layer.markers[0];
        assert_eq!(marker.style.fill_color, ColorBucket::Orange);
        assert!((marker.style.radius - 22.5).abs() < f64::EPSILON);
        assert_eq!(marker.position, LatLng::new(37.0, -120.5));
        assert!(marker.popup.contains("10km NE of Town"));
        assert!(marker.popup.contains("Magnitude: 4.5"));
        assert!(marker.popup.contains("Tue Nov 14 2023 22:13:20 UTC"));
    }

    #[test]
    fn test_radius_is_five_times_magnitude() {
        for m in [0.0, 0.3, 1.0, 2.5, 7.1] {
            let style = MarkerStyle::for_magnitude(m);
            assert!((style.radius - m * 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_negative_magnitude_clamps_radius() {
        let style = MarkerStyle::for_magnitude(-0.8);
        assert!(style.radius.abs() < f64::EPSILON);
        assert_eq!(style.fill_color, ColorBucket::White);
        assert!(style.fill_opacity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_fill_opacity_clamped() {
        assert!((MarkerStyle::for_magnitude(2.5).fill_opacity - 0.5).abs() < 1e-12);
        assert!((MarkerStyle::for_magnitude(7.0).fill_opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_marker_per_feature_in_order() {
        let feed: FeatureCollection = serde_json::from_str(SAMPLE_FEED).expect("parse");
        let layer = render_markers(&feed.features);

        assert_eq!(layer.len(), feed.features.len());
        assert_eq!(layer.name, OVERLAY_NAME);
        for (marker, feature) in layer.markers.iter().zip(&feed.features) {
            assert!(!marker.popup.is_empty());
            assert!((marker.position.lat - feature.latitude()).abs() < f64::EPSILON);
        }
        assert_eq!(layer.markers[1].style.fill_color, ColorBucket::Red);
    }

    #[test]
    fn test_missing_fields_popup() {
        let feed: FeatureCollection = serde_json::from_str(SAMPLE_FEED).expect("parse");
        let marker = Marker::from(feed.features.last().expect("non-empty"));

        assert!(marker.popup.contains("Unknown location"));
        assert!(marker.popup.contains("Magnitude: unknown"));
        assert!(marker.style.radius.abs() < f64::EPSILON);
        assert_eq!(marker.style.fill_color, ColorBucket::White);
    }

    #[test]
    fn test_missing_time_still_renders() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"geometry":{"coordinates":[1.0,2.0]},"properties":{"mag":1.5,"place":"a","time":5}},
            {"geometry":{"coordinates":[3.0,4.0]},"properties":{"mag":2.0,"place":"b"}}]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).expect("parse");
        let layer = render_markers(&feed.features);

        assert_eq!(layer.len(), 2);
        assert!(!layer.markers[0].popup.contains("unknown time"));
        assert!(layer.markers[1].popup.contains("<p>unknown time</p>"));
        assert_eq!(layer.markers[1].style.fill_color, ColorBucket::Blue);
    }

    #[test]
    fn test_whole_magnitude_has_no_decimal() {
        let f = feature("Somewhere", Some(5.0), 0, 0.0, 0.0);
        assert!(popup_html(&f).contains("Magnitude: 5<"));
    }

    #[test]
    fn test_place_is_escaped() {
        let f = feature("<b>A & B</b>", Some(1.0), 0, 0.0, 0.0);
        let popup = popup_html(&f);
        assert!(popup.contains("&lt;b&gt;A &amp; B&lt;/b&gt;"));
        assert!(!popup.contains("<b>"));
    }

    #[test]
    fn test_empty_feature_list() {
        let layer = render_markers(&[]);
        assert!(layer.is_empty());
    }
}
