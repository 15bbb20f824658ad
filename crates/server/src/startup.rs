use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::ApiKeyStore;
use service::storage::StorageRoot;

use crate::auth::ServerState;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = configs::AppConfig::load_and_validate()?;

    common::env::ensure_env("data", &cfg.storage.root).await?;

    let db = models::db::connect_and_migrate(&cfg.database.url).await?;

    let storage = StorageRoot::new(&cfg.storage.root);
    storage.ensure_layout().await?;

    let keys = ApiKeyStore::load(&cfg.auth.keys_file).await?;

    let state = ServerState { db, storage, keys };
    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "asset server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
