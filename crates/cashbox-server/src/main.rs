mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use cashbox_api::{AppStateInner, initialize, router};
use cashbox_db::{Database, Store};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cashbox=debug,cashbox_api=debug,cashbox_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database, then tables and the admin account
    let store: Arc<dyn Store> = Arc::new(Database::open(&config.db_path)?);
    initialize(store.as_ref(), &config.admin)?;

    let mut app = router(AppStateInner::new(store));
    if let Some(dir) = &config.static_dir {
        info!("Serving frontend from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    let app = app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Cashbox server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
