mod config;
mod error;
mod redis_store;
mod routes;
mod store;

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Settings;
use redis_store::RedisStore;
use routes::SharedStore;
use store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasks_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: SharedStore = match &settings.redis_url {
        Some(url) => {
            tracing::info!(%url, "using redis store");
            Arc::new(RedisStore::open(url).context("failed to open redis client")?)
        }
        None => {
            tracing::info!("using in-memory store");
            Arc::new(MemoryStore::default())
        }
    };

    let mut app = routes::router(store);
    if let Some(dir) = &settings.static_dir {
        tracing::info!(dir = %dir.display(), "serving frontend under /app");
        app = app.nest_service("/app", ServeDir::new(dir));
    }
    let app = app
        .layer(cors_layer(&settings))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!("server running on http://{}", settings.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.allows_any_origin() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
