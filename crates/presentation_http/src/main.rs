//! Voice assistant HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::{HealthService, PipelineService};
use infrastructure::{AppConfig, LogFormat, ProviderRegistryAdapter, SpeechAdapter};
use presentation_http::{BodyLimits, routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info,voice_assistant_server=debug,presentation_http=debug,\
                              application=debug,infrastructure=debug,ai_core=debug,\
                              ai_speech=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = AppConfig::load();

    let log_format = loaded
        .as_ref()
        .map(|c| c.server.log_format)
        .unwrap_or_default();
    init_tracing(log_format);

    info!("🎙️ Voice assistant v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default().with_env_overrides()
    });

    info!(
        host = %config.server.host,
        port = %config.server.port,
        default_provider = %config.providers.default_provider,
        stt_model = %config.speech.stt.model_path.display(),
        tts_model = %config.speech.tts.model_path.display(),
        "Configuration loaded"
    );

    // Initialize adapters
    let generator = Arc::new(ProviderRegistryAdapter::from_settings(
        config.providers.clone(),
    ));
    let speech = Arc::new(
        SpeechAdapter::new(config.speech.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech engines: {e}"))?,
    );

    // Initialize services
    let pipeline = PipelineService::new(generator.clone(), speech.clone(), speech.clone());
    let health =
        HealthService::new(generator, speech.clone(), speech).with_config(config.health.clone());

    let state = AppState {
        pipeline: Arc::new(pipeline),
        health: Arc::new(health),
    };

    // Build router
    let limits = BodyLimits::from(&config.server);
    let app = routes::create_router(state, limits);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    // Add middleware (order matters: first added = outermost)
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(RequestBodyLimitLayer::new(limits.max()));

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Install the global subscriber with text or JSON output
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let (text, json) = match format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);
}
