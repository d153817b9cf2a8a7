use anyhow::Context;
use clap::Parser;
use furniture_recommender::{
    AppConfig, Recommender,
    handler::{AppState, router},
    scene::Scene,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "furniture-recommender", version, about = "Chair recommendations from Gemini on Vertex AI")]
struct Args {
    /// TOML config file; environment variables are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address, overrides the configured one
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => AppConfig::from_env().context("Failed to load config from environment")?,
    };
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    config.validate().context("Invalid configuration")?;

    info!("Starting furniture recommender...");
    info!("  Listen: {}", config.server.listen_addr);
    info!(
        "  Vertex AI: project {} in {}",
        config.vertex.project, config.vertex.location
    );
    info!(
        "  Models: {} (vision), {} (text)",
        config.vertex.vision_model, config.vertex.text_model
    );

    let recommender = Recommender::from_config(&config)?;
    let state = Arc::new(AppState::new(
        recommender,
        Scene::living_room(),
        config.generation.clone(),
    ));
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    info!("Recommender ready!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{}", state.recommender.metrics().snapshot());
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("furniture_recommender=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutting down");
}
