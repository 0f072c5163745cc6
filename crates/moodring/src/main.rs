use anyhow::{Context, Result};
use clap::Parser;
use moodconf::MoodConfig;
use moodring::dispatch::DetectionDispatcher;
use moodring::frame_sink::FrameSink;
use moodring::music::MusicLibrary;
use moodring::sessions::SessionRegistry;
use moodring::throttle::ThrottleGate;
use moodring::{detector, telemetry, web};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The Moodring streaming server
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a config file (takes precedence over ./moodring.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Detector to use: "mock" or "remote" (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Remote detector endpoint, e.g. "http://127.0.0.1:2000"
    #[arg(long)]
    detector_endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        MoodConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.bind.http_port = port;
    }
    if let Some(model) = cli.model {
        config.detection.model_type = model;
    }
    if let Some(endpoint) = cli.detector_endpoint {
        config.detection.endpoint = Some(endpoint);
    }

    telemetry::init(&config.telemetry.log_level);

    tracing::info!("🎭 Starting Moodring...");

    let detector =
        detector::from_config(&config.detection).context("Failed to initialize detector")?;
    tracing::info!("   Detector: {}", detector.model_type());
    tracing::info!(
        "   Detection interval: {}ms, threshold: {}",
        config.detection.interval_ms,
        config.detection.confidence_threshold
    );

    let library = match &config.music.songs_path {
        Some(path) => Arc::new(MusicLibrary::from_file(path).with_context(|| {
            format!("Failed to load songs database from {}", path.display())
        })?),
        None => Arc::new(MusicLibrary::builtin()),
    };
    tracing::info!("   Music library: {} moods", library.mood_count());

    let gate = ThrottleGate::from_millis(config.detection.interval_ms);
    let mut dispatcher = DetectionDispatcher::new(detector, library, gate);
    if config.storage.save_frames {
        std::fs::create_dir_all(&config.storage.frames_dir)
            .context("Failed to create frames directory")?;
        dispatcher = dispatcher.with_frame_sink(FrameSink::new(&config.storage.frames_dir));
        tracing::info!("   Saving frames to: {}", config.storage.frames_dir.display());
    }

    let state = web::WebState {
        registry: Arc::new(SessionRegistry::new()),
        dispatcher: Arc::new(dispatcher),
    };
    let app = web::router(state);

    let addr = format!("0.0.0.0:{}", config.bind.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("🎵 Moodring listening on http://{}", addr);
    tracing::info!("   Stream: ws://{}/stream", addr);
    tracing::info!("   Health: GET http://{}/api/health", addr);
    tracing::info!("   Stats: GET http://{}/api/stats", addr);
    tracing::info!("   Moods: GET http://{}/api/moods", addr);

    let shutdown_token = CancellationToken::new();
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            signal_token.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
        .await
        .context("Server error")?;

    tracing::info!("👋 Moodring stopped");
    Ok(())
}
