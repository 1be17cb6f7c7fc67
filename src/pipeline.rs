//! Fetch, render, compose.
//!
//! One pass per page: load the feed, turn features into markers, and lay
//! the map out. A feed failure drops the overlay but not the map.

use tracing::{debug, info, warn};

use crate::client::FeedClient;
use crate::composer::{MapConfig, compose};
use crate::errors::QuakeMapError;
use crate::leaflet::render_page;
use crate::marker::{MarkerLayer, render_markers};
use crate::surface::MapScene;

/// Title of the generated page.
pub const PAGE_TITLE: &str = "Earthquakes";

/// Load the feed and render it into the marker overlay.
///
/// # Errors
///
/// Returns the loader error unchanged.
pub async fn load_markers(client: &FeedClient, feed_url: &str) -> Result<MarkerLayer, QuakeMapError> {
    let feed = client.fetch(feed_url).await?;
    let overlay = render_markers(&feed.features);
    if overlay.is_empty() {
        info!("feed returned no events");
    } else {
        debug!("rendered {} markers", overlay.len());
    }
    Ok(overlay)
}

/// Run the whole pipeline into a recorded scene.
///
/// # Errors
///
/// Only configuration errors fail; feed errors are logged and the scene is
/// composed without an overlay.
pub async fn build_scene(
    client: &FeedClient,
    feed_url: &str,
    config: &MapConfig,
) -> Result<MapScene, QuakeMapError> {
    config.validate()?;

    let overlay = match load_markers(client, feed_url).await {
        Ok(overlay) => Some(overlay),
        Err(e) => {
            warn!("feed unavailable, rendering map without earthquakes: {e}");
            None
        }
    };

    let mut scene = MapScene::new();
    compose(&mut scene, config, overlay)?;

    info!(
        markers = scene.marker_layer().map_or(0, MarkerLayer::len),
        "composed map"
    );
    Ok(scene)
}

/// Run the pipeline and emit the Leaflet page.
///
/// # Errors
///
/// See [`build_scene`].
pub async fn build_page(
    client: &FeedClient,
    feed_url: &str,
    config: &MapConfig,
) -> Result<String, QuakeMapError> {
    let scene = build_scene(client, feed_url, config).await?;
    Ok(render_page(&scene, PAGE_TITLE))
}
