use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use voxquery::{create_router, AppState, Config, GroqClient};

#[derive(Parser, Debug)]
#[command(name = "voxquery", about = "Audio transcription Q&A service")]
struct Args {
    /// Path to the config file (optional; defaults apply without one)
    #[arg(short, long, default_value = "config/voxquery")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Uploads directory: {}", cfg.storage.uploads_dir);

    let groq = Arc::new(
        GroqClient::from_env(cfg.groq.clone()).context("Failed to initialize Groq client")?,
    );

    let state = AppState::new(groq.clone(), groq, &cfg.storage.uploads_dir);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}
