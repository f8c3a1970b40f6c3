pub mod picker;

#[cfg(not(target_arch = "wasm32"))]
pub mod cache;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod controllers;
#[cfg(not(target_arch = "wasm32"))]
pub mod database;
#[cfg(not(target_arch = "wasm32"))]
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod middleware;
#[cfg(not(target_arch = "wasm32"))]
pub mod models;
#[cfg(not(target_arch = "wasm32"))]
pub mod redis_client;
#[cfg(not(target_arch = "wasm32"))]
pub mod views;

#[cfg(not(target_arch = "wasm32"))]
pub use server::{router, AppState};

#[cfg(not(target_arch = "wasm32"))]
mod server {
    use axum::{routing::get, Router};
    use std::sync::Arc;
    use tower_http::{services::ServeDir, trace::TraceLayer};

    use crate::{cache, config, controllers, database, redis_client};

    // Shared state for the whole application
    #[derive(Clone)]
    pub struct AppState {
        pub db: database::Database,
        pub redis: redis_client::RedisClient,
        pub cache: cache::CacheService,
        pub config: config::Config,
    }

    impl AppState {
        pub fn new(
            config: config::Config,
            db: database::Database,
            redis: redis_client::RedisClient,
        ) -> Arc<Self> {
            let cache = cache::CacheService::new(
                redis.clone(),
                db.clone(),
                config.redis.seat_cache_ttl_seconds,
                config.session.ttl_seconds,
            );
            Arc::new(Self {
                db,
                redis,
                cache,
                config,
            })
        }
    }

    /// Pages, health check and the static bundle (wasm picker, styles).
    pub fn router(state: Arc<AppState>) -> Router {
        let static_files = ServeDir::new(&state.config.app.static_dir);
        Router::new()
            .route("/health", get(|| async { "OK" }))
            .merge(controllers::routes())
            .nest_service("/static", static_files)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }
}
