use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use mimalloc::MiMalloc;
use respmatch::config::AppConfig;
use respmatch::services::response_group;
use respmatch::store::TemplateStore;
use respmatch::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "respmatch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let store = Arc::new(TemplateStore::new());
    if let Some(path) = config.templates_seed_path.as_deref() {
        response_group::seed_from_file(&store, Path::new(path))?;
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(host = %addr, "Starting response matching API server");

    let state = AppState { store, config };
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
