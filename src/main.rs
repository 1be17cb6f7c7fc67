//! quakemap - the live earthquake feed on a web map.
//!
//! Fetches the USGS GeoJSON feed, sizes and colors one marker per event by
//! magnitude, and lays them over switchable tile base layers with a legend.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

mod bucket;
mod cli;
mod client;
mod composer;
mod errors;
mod leaflet;
mod legend;
mod marker;
mod models;
mod output;
mod pipeline;
mod server;
mod surface;

use cli::{Cli, Command};
use client::FeedClient;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    match cli.command {
        Command::Render(args) => runtime.block_on(cmd_render(args)),
        Command::Serve(args) => runtime.block_on(cmd_serve(args)),
        Command::Markers(args) => runtime.block_on(cmd_markers(args)),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the `render` command - one fetch, one page.
async fn cmd_render(args: cli::RenderArgs) -> Result<()> {
    let client = FeedClient::new().context("failed to create feed client")?;
    let config = args.map.to_config();

    let page = pipeline::build_page(&client, &args.feed.url(), &config)
        .await
        .context("failed to build map page")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &page)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("wrote map to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(page.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}

/// Execute the `serve` command - start web server.
async fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        feed_url: args.feed.url(),
        map: args.map.to_config(),
    };

    // Print startup message
    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakemap\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", config.feed_url);
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    server::run_server(config).await
}

/// Execute the `markers` command - list what the map would draw.
async fn cmd_markers(args: cli::MarkersArgs) -> Result<()> {
    let client = FeedClient::new().context("failed to create feed client")?;

    let feed = client
        .fetch(&args.feed.url())
        .await
        .context("failed to fetch earthquake feed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_markers(&mut handle, &feed.features, args.format)?;

    Ok(())
}
