use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use repdeck::api::ApiClient;
use repdeck::app::App;
use repdeck::config::ConfigManager;
use repdeck::feed::{FeedController, InitialDataSource, LikeMutationCoordinator};
use repdeck::logging::{self, LogConfig};
use repdeck::server_config::ServerConfigManager;
use repdeck::{terminal, ui};
use repdeck_types::ColorScheme;

/// Frame interval for smooth scrolling and playback
const FRAME: Duration = Duration::from_millis(33);

/// RepDeck - a paged terminal feed for workout and meal posts
#[derive(Parser)]
#[command(name = "repdeck")]
#[command(about = "Swipe through workout and meal posts from your terminal")]
#[command(version)]
struct Cli {
    /// Server URL to connect to
    #[arg(long, short, env = "REPDECK_SERVER_URL")]
    server: Option<String>,

    /// Remember the resolved server URL for later runs
    #[arg(long)]
    save_server: bool,

    /// Color scheme: default, dark or light
    #[arg(long, value_parser = parse_color_scheme)]
    theme: Option<ColorScheme>,

    /// Read the initial posts from a JSON payload file instead of the server
    #[arg(long, short)]
    payload: Option<PathBuf>,

    /// CSRF token sent with like requests
    #[arg(long, env = "REPDECK_CSRF_TOKEN")]
    csrf_token: Option<String>,

    /// Session cookie for the server
    #[arg(long, env = "REPDECK_SESSION_ID")]
    session_id: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

fn parse_color_scheme(value: &str) -> Result<ColorScheme, String> {
    ColorScheme::parse(value).ok_or_else(|| format!("unknown color scheme '{}'", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks can see it
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    logging::init_logging(&log_config)?;

    let client_config = ConfigManager::new()
        .and_then(|manager| manager.load_client_config())
        .unwrap_or_else(|e| {
            log::warn!("Using default client config: {:#}", e);
            Default::default()
        });

    let server_config_manager = ServerConfigManager::new()?;
    let server_url = server_config_manager
        .determine_server_url(cli.server.or_else(|| client_config.server_url.clone()))?;
    log::info!(
        "Server: {} ({})",
        server_url,
        server_config_manager.get_server_description(&server_url)
    );
    if cli.save_server {
        server_config_manager
            .save_server_url(server_url.clone())
            .context("Failed to save server URL")?;
    }

    let mut api_client = ApiClient::new(&server_url);
    api_client.set_csrf_token(cli.csrf_token);
    api_client.set_session_id(cli.session_id);

    let source = match cli.payload {
        Some(path) => InitialDataSource::EmbeddedFile(path),
        None => InitialDataSource::Remote(api_client.clone()),
    };
    let posts = source.load().await;

    let coordinator = LikeMutationCoordinator::new(Arc::new(api_client));
    let feed = FeedController::new(posts, coordinator, client_config.feed_settings());

    let mut app = App::new(feed, &client_config.suppressed_keys);
    app.color_scheme = cli.theme.unwrap_or(client_config.color_scheme);
    log::info!("Color scheme: {}", app.color_scheme.as_str());
    app.log_config = log_config;

    let mut tui = terminal::init()?;
    let result = run(&mut app, &mut tui).await;

    app.shutdown();
    terminal::restore()?;
    result
}

async fn run(app: &mut App, tui: &mut terminal::Tui) -> Result<()> {
    let mut dirty = true;
    let mut last_frame = Instant::now();

    while app.running {
        if dirty {
            tui.draw(|frame| ui::render(app, frame))
                .context("Failed to draw frame")?;
            dirty = false;
        }

        let timeout = FRAME.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            app.handle_event(event::read()?)?;
            dirty = true;
        }

        if last_frame.elapsed() >= FRAME {
            dirty |= app.tick();
            last_frame = Instant::now();
        }

        // Let spawned like requests make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}
