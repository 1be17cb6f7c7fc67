//! Leaflet page emitter.
//!
//! Turns a recorded [`MapScene`] into a standalone HTML document. The scene
//! is embedded as JSON and a small bootstrap script replays it against the
//! Leaflet API in the browser.

use serde_json::{Value, json};

use crate::marker::{Marker, escape_html};
use crate::surface::{Control, LatLng, Layer, LayerId, MapScene, TileLayer};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// View used when the scene never set one.
const FALLBACK_VIEW: (LatLng, u8) = (LatLng::new(0.0, 0.0), 1);

const BOOTSTRAP_JS: &str = r#"(function () {
  var scene = __SCENE__;
  var built = scene.layers.map(function (spec) {
    if (spec.kind === "tile") {
      return L.tileLayer(spec.url, spec.options);
    }
    return L.layerGroup(spec.markers.map(function (m) {
      return L.circleMarker(m.latlng, m.style).bindPopup(m.popup);
    }));
  });
  var map = L.map("map", {
    center: scene.view.center,
    zoom: scene.view.zoom,
    layers: built.filter(function (_, i) { return scene.layers[i].active; })
  });
  function named(ids) {
    var out = {};
    ids.forEach(function (i) { out[scene.layers[i].name] = built[i]; });
    return out;
  }
  scene.controls.forEach(function (spec) {
    if (spec.kind === "legend") {
      var legend = L.control({ position: spec.position });
      legend.onAdd = function () {
        var div = L.DomUtil.create("div", "info legend");
        div.innerHTML = spec.html;
        return div;
      };
      legend.addTo(map);
    } else if (spec.kind === "layers") {
      L.control.layers(named(spec.base), named(spec.overlays), {
        collapsed: spec.collapsed,
        position: spec.position
      }).addTo(map);
    }
  });
})();"#;

/// Render the scene as a full HTML page.
#[must_use]
pub fn render_page(scene: &MapScene, title: &str) -> String {
    let scene_json = script_safe(&scene_to_json(scene).to_string());
    let script = BOOTSTRAP_JS.replace("__SCENE__", &scene_json);
    let title = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="{LEAFLET_CSS}">
  <script src="{LEAFLET_JS}"></script>
  <style>
    html, body, #map {{ height: 100%; margin: 0; padding: 0; }}
    .info {{ padding: 6px 8px; font: 14px/16px Arial, Helvetica, sans-serif; background: white; background: rgba(255,255,255,0.8); box-shadow: 0 0 15px rgba(0,0,0,0.2); border-radius: 5px; }}
    .legend {{ line-height: 18px; color: #555; }}
    .legend i {{ width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.7; }}
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
{script}
  </script>
</body>
</html>
"#
    )
}

/// Serialize the scene into the shape the bootstrap script reads.
#[must_use]
pub fn scene_to_json(scene: &MapScene) -> Value {
    let (center, zoom) = scene.view.unwrap_or(FALLBACK_VIEW);

    let layers: Vec<Value> = scene
        .layers
        .iter()
        .map(|entry| match &entry.layer {
            Layer::Tile(tile) => tile_json(tile, entry.active),
            Layer::Markers(markers) => json!({
                "kind": "markers",
                "name": entry.layer.name(),
                "active": entry.active,
                "markers": markers.markers.iter().map(marker_json).collect::<Vec<_>>(),
            }),
        })
        .collect();

    let index_of = |ids: &[LayerId]| -> Vec<usize> {
        ids.iter()
            .filter_map(|id| scene.layers.iter().position(|l| l.id == *id))
            .collect()
    };

    let controls: Vec<Value> = scene
        .controls
        .iter()
        .map(|control| match control {
            Control::Legend { legend, position } => json!({
                "kind": "legend",
                "position": position.as_str(),
                "html": legend.to_html(),
            }),
            Control::LayerSwitcher(switcher) => json!({
                "kind": "layers",
                "position": switcher.position.as_str(),
                "collapsed": switcher.collapsed,
                "base": index_of(&switcher.base_layers),
                "overlays": index_of(&switcher.overlays),
            }),
        })
        .collect();

    json!({
        "view": { "center": [center.lat, center.lng], "zoom": zoom },
        "layers": layers,
        "controls": controls,
    })
}

fn tile_json(tile: &TileLayer, active: bool) -> Value {
    json!({
        "kind": "tile",
        "name": tile.name,
        "active": active,
        "url": tile.url_template,
        "options": {
            "attribution": tile.attribution,
            "maxZoom": tile.max_zoom,
            "id": tile.style_id,
            "accessToken": tile.access_token,
        },
    })
}

fn marker_json(marker: &Marker) -> Value {
    let style = &marker.style;
    json!({
        "latlng": [marker.position.lat, marker.position.lng],
        "style": {
            "radius": style.radius,
            "fillColor": style.fill_color.as_css(),
            "color": style.stroke_color,
            "weight": style.stroke_weight,
            "opacity": style.stroke_opacity,
            "fillOpacity": style.fill_opacity,
        },
        "popup": marker.popup,
    })
}

/// Keep embedded JSON from closing the surrounding script element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{MapConfig, compose};
    use crate::marker::render_markers;
    use crate::models::tests::feature;

    fn scene(with_overlay: bool) -> MapScene {
        let overlay = with_overlay.then(|| {
            render_markers(&[
                feature("10km NE of Town", Some(4.5), 1_700_000_000_000, -120.5, 37.0),
                feature("Offshore", Some(5.5), 1_700_000_000_000, -125.0, 40.0),
            ])
        });
        let mut scene = MapScene::new();
        compose(&mut scene, &MapConfig::new("pk.abc"), overlay).unwrap();
        scene
    }

    #[test]
    fn test_scene_json_layers() {
        let value = scene_to_json(&scene(true));

        assert_eq!(value["view"]["zoom"], 5);
        assert_eq!(value["layers"].as_array().unwrap().len(), 3);
        assert_eq!(value["layers"][0]["options"]["id"], "mapbox.streets");
        assert_eq!(value["layers"][1]["active"], false);

        let first = &value["layers"][2]["markers"][0];
        assert_eq!(first["style"]["fillColor"], "Orange");
        assert_eq!(first["style"]["radius"], 22.5);
        assert_eq!(first["latlng"][0], 37.0);
        assert_eq!(value["layers"][2]["markers"][1]["style"]["fillColor"], "Red");
    }

    #[test]
    fn test_scene_json_controls() {
        let value = scene_to_json(&scene(true));
        let controls = value["controls"].as_array().unwrap();

        assert_eq!(controls[0]["kind"], "legend");
        assert_eq!(controls[0]["position"], "bottomright");
        assert_eq!(controls[1]["collapsed"], false);
        assert_eq!(controls[1]["base"], json!([0, 1]));
        assert_eq!(controls[1]["overlays"], json!([2]));
    }

    #[test]
    fn test_page_contains_map_and_leaflet() {
        let page = render_page(&scene(true), "Earthquakes");

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(LEAFLET_JS));
        assert!(page.contains(r#"<div id="map"></div>"#));
        assert!(page.contains("10km NE of Town"));
        assert!(!page.contains("__SCENE__"));
    }

    #[test]
    fn test_embedded_html_cannot_close_script() {
        let page = render_page(&scene(true), "t");
        let script = page
            .split("<script>")
            .nth(1)
            .and_then(|rest| rest.split("</script>").next())
            .unwrap();

        assert!(script.contains(r"<\/h3>"));
        assert!(script.contains("Magnitude: 4.5"));
    }

    #[test]
    fn test_page_without_overlay() {
        let value = scene_to_json(&scene(false));
        assert_eq!(value["layers"].as_array().unwrap().len(), 2);
        assert_eq!(value["controls"][1]["overlays"], json!([]));
        assert!(value["controls"][0]["html"].as_str().unwrap().contains("5+"));
    }

    #[test]
    fn test_empty_scene_uses_fallback_view() {
        let value = scene_to_json(&MapScene::new());
        assert_eq!(value["view"]["zoom"], 1);
        assert_eq!(value["layers"], json!([]));
    }
}
