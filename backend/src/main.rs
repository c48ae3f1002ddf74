use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::{routing::get, Json, Router};
use redis::Client as RedisClient;
use serde_json::json;
use shared::shared_wheel_game::{PrizeCatalog, WheelConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Error;
use crate::games::backend_wheel_game::create_router as create_wheel_game_router;
use crate::services::history_store::HistoryStore;
use crate::services::notifier::Notifier;

mod config;
mod error;
mod games;
mod logging;
mod services;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PrizeCatalog>,
    pub wheel: Arc<WheelConfig>,
    pub store: HistoryStore,
    pub notifier: Notifier,
    pub history_limit: usize,
    pub in_flight: Arc<Mutex<HashSet<String>>>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, Error> {
        config.check()?;

        let store = match &config.redis_url {
            Some(url) => HistoryStore::redis(RedisClient::open(url.as_str())?, config.history_limit),
            None => HistoryStore::memory(config.history_limit),
        };

        Ok(Self {
            catalog: Arc::new(config.catalog.clone()),
            wheel: Arc::new(config.wheel.clone()),
            store,
            notifier: Notifier::new(config.webhook_url.clone(), config.announce_all),
            history_limit: config.history_limit,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        })
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health_check", get(health_check))
        .nest("/wheel", create_wheel_game_router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(".env").ok();
    logging::setup();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    info!(
        "Wheel ready: {} prizes, {} ms cooldown, ultra-rare after {} spins, store: {}",
        config.catalog.len(),
        config.wheel.cooldown_ms,
        config.wheel.ultra_rare_threshold,
        if config.redis_url.is_some() { "redis" } else { "memory" }
    );
    if config.webhook_url.is_none() {
        info!("WHEEL_WEBHOOK_URL not set, spin announcements are disabled");
    }

    let app = build_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
