use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snaptext::api::{create_router, AppState};
use snaptext::config::Config;
use snaptext::db::{Database, DatabaseBackend, LibSqlBackend};
use snaptext::ocr::{OcrDispatcher, OcrEngine, PaddleEngine, TesseractEngine};

#[derive(Parser)]
#[command(name = "snaptext")]
#[command(about = "Self-hostable OCR text extraction service")]
struct Args {
    /// Override the listening port from SNAPTEXT_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snaptext=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    tracing::info!("Initializing OCR engines...");
    let tesseract = TesseractEngine::new(&config.ocr);
    let paddle = PaddleEngine::new(&config.ocr);

    // Priority order: Tesseract first, Paddle as fallback. With neither
    // usable the dispatcher degrades to a placeholder response.
    let ocr = OcrDispatcher::new(vec![
        Arc::new(tesseract) as Arc<dyn OcrEngine>,
        Arc::new(paddle) as Arc<dyn OcrEngine>,
    ]);

    for (name, available) in ocr.engine_status().await {
        if available {
            tracing::info!(engine = name, "OCR engine ready");
        } else {
            tracing::warn!(engine = name, "OCR engine unavailable");
        }
    }

    let state = AppState::new(config.clone(), db, ocr);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Snaptext starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
