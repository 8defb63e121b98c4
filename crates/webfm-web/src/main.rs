mod api;
mod config;
mod dto;
mod error;
mod middleware;
mod session;
mod state;

use axum::http::{header, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webfm_web=debug,webfm_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let bind_addr = config.bind_addr;
    let tls_config = config.tls.clone();

    if config.core.exec.enabled {
        tracing::info!(
            "Command execution enabled for: {}",
            config.core.exec.allowed_programs.join(", ")
        );
    }

    let state = AppState::new(config);

    // Session cleanup task
    let cleanup_store = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_store.cleanup_expired();
        }
    });

    let app = build_router(state);

    if let (Some(cert), Some(key)) = (&tls_config.cert_path, &tls_config.key_path) {
        use axum_server::tls_rustls::RustlsConfig;
        let rustls_config = RustlsConfig::from_pem_file(cert, key).await?;
        tracing::info!("webfm listening on https://{}", bind_addr);
        axum_server::bind_rustls(bind_addr, rustls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        tracing::info!("webfm listening on http://{}", bind_addr);
        axum::serve(listener, app).await?;
    }

    Ok(())
}

/// The JSON API under `/api`, static assets for everything else.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes();
    let hsts = state.config.tls.is_enabled();
    let public_dir = state.config.filesystem.public_dir.clone();

    // CORS: same-origin only by default (no cross-origin requests allowed)
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", api::router(body_limit))
        .fallback_service(ServeDir::new(public_dir))
        .layer(from_fn(session::session_cookie))
        .layer(from_fn_with_state(
            hsts,
            middleware::security_headers::security_headers,
        ))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
