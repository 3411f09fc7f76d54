use anyhow::{Context, Result};
use std::sync::Arc;
use storyprint::PageGeometry;
use storyprint_api::{app_with_state, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyprint_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let geometry = match std::env::var("STORYPRINT_GEOMETRY") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read geometry file {path}"))?;
            PageGeometry::from_json(&json)
                .with_context(|| format!("Invalid geometry file {path}"))?
        }
        Err(_) => PageGeometry::default(),
    };

    let addr = std::env::var("STORYPRINT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let app = app_with_state(Arc::new(AppState::new(geometry)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("storyprint API listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
