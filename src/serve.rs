use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use log::{info, warn};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppType, ServerConfig};
use crate::db::prepare_database;
use crate::error::DynError;
use crate::{booking, trivia};

/// Shared by every handler through axum `State`
pub struct AppState {
    pub config: ServerConfig,
    pub pool: SqlitePool,
}

/// Log method, URI, status and latency of each request
async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if status.is_server_error() {
        warn!("{} {} -> {} ({:.1} ms)", method, uri, status.as_u16(), elapsed_ms);
    } else {
        info!("{} {} -> {} ({:.1} ms)", method, uri, status.as_u16(), elapsed_ms);
    }
    response
}

/// CORS for the trivia API; any origin unless the config lists some
fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, DynError> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let layer = match &config.cors_allowed_origins {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let values = origins
                .iter()
                .map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .map_err(|e| format!("Invalid CORS origin '{}': {}", origin, e))
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer.allow_origin(AllowOrigin::list(values))
        }
    };
    Ok(layer)
}

/// The router for whichever app `state.config` selects
pub fn build_router(state: Arc<AppState>) -> Result<Router, DynError> {
    let routes = match state.config.app_type {
        AppType::Booking => booking::router(),
        AppType::Trivia => trivia::router().layer(cors_layer(&state.config)?),
    };

    Ok(routes
        .with_state(state)
        .layer(middleware::from_fn(log_requests)))
}

/// Prepare the database and serve until the process is stopped
pub async fn serve(config: ServerConfig) -> Result<(), DynError> {
    let pool = prepare_database(&config.database_file, config.app_type, config.max_connections).await?;
    let bind_target = config.bind_target();
    let app_type = config.app_type;

    let app = build_router(Arc::new(AppState { config, pool }))?;

    let listener = tokio::net::TcpListener::bind(&bind_target)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", bind_target, e))?;

    info!(
        "Serving {} app on http://{}",
        app_type.as_str(),
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
