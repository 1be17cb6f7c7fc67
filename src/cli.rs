//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::client::{FeedType, USGS_BASE_URL};
use crate::composer::{DEFAULT_TILE_URL, MapConfig};
use crate::output::Format;
use crate::surface::LatLng;

/// Render the live earthquake feed as a web map.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the feed once and write the map page
    Render(RenderArgs),

    /// Serve the map page, rebuilt on every load
    Serve(ServeArgs),

    /// Print the markers the feed renders to
    Markers(MarkersArgs),
}

/// Where the earthquake feed comes from.
#[derive(Args, Debug)]
pub struct FeedArgs {
    /// USGS summary feed to fetch
    #[arg(long, default_value = "all_week", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Explicit feed URL, overrides --feed
    #[arg(long)]
    pub feed_url: Option<String>,
}

impl FeedArgs {
    /// Resolve the URL to fetch.
    #[must_use]
    pub fn url(&self) -> String {
        self.feed_url
            .clone()
            .unwrap_or_else(|| self.feed.url(USGS_BASE_URL))
    }
}

/// Viewport and tile options.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Tile provider access token
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Tile URL template ({id}, {z}, {x}, {y}, {accessToken})
    #[arg(long, default_value = DEFAULT_TILE_URL)]
    pub tile_url: String,

    /// Initial map center: lat,lon
    #[arg(long, default_value = "37.09,-95.71", value_parser = parse_center)]
    pub center: LatLng,

    /// Initial zoom level
    #[arg(long, default_value = "5")]
    pub zoom: u8,
}

impl MapArgs {
    /// Build the map configuration.
    #[must_use]
    pub fn to_config(&self) -> MapConfig {
        MapConfig {
            center: self.center,
            zoom: self.zoom,
            tile_url: self.tile_url.clone(),
            ..MapConfig::new(self.access_token.clone())
        }
    }
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    #[command(flatten)]
    pub map: MapArgs,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    pub output: Option<std::path::PathBuf>,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    #[command(flatten)]
    pub map: MapArgs,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the `markers` command.
#[derive(Parser, Debug)]
pub struct MarkersArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a map center from string.
fn parse_center(s: &str) -> Result<LatLng, String> {
    s.parse()
}
