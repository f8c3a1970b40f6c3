#[cfg(not(target_arch = "wasm32"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use std::net::SocketAddr;
    use tracing::info;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    use seat_booking::{config::Config, database::Database, redis_client::RedisClient, AppState};

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    if config.app.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting seat booking server");

    // Connect to the database
    let db = Database::new(&config.database.url, config.database.pool_size)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    // Sessions and the seat cache live in Redis
    let redis = RedisClient::new(&config.redis.url).context("Invalid REDIS_URL")?;
    redis.ping().await.context("Failed to connect to Redis")?;
    info!("Redis connected");

    let host: std::net::IpAddr = config
        .app
        .host
        .parse()
        .context("HOST must be an IP address")?;
    let addr = SocketAddr::new(host, config.app.port);

    let app = seat_booking::router(AppState::new(config, db, redis));

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
