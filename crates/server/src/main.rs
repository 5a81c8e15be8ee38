use std::{io, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use server_api::{health, list_items, reorder_items, ApiContext};
use shared::{
    domain::Item,
    error::{ApiError, ErrorCode},
    protocol::{ReorderRequest, ReorderResponse, HEALTH_ROUTE, ITEMS_ROUTE, REORDER_ROUTE},
};
use storage::Storage;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use crate::config::{load_settings, prepare_database_url, Settings};

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    if settings.seed_defaults {
        storage
            .seed_default_items()
            .await
            .context("failed to seed default items")?;
    }

    let state = AppState {
        api: ApiContext::new(storage),
    };
    let app = build_router(Arc::new(state), &settings)?;

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid server_bind '{}'", settings.server_bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|error| {
            if error.kind() == io::ErrorKind::AddrInUse {
                error!(%addr, "port is already in use");
            } else {
                error!(%addr, %error, "failed to bind server socket");
            }
            error
        })?;
    info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shutdown complete");
    Ok(())
}

fn build_router(state: Arc<AppState>, settings: &Settings) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(ITEMS_ROUTE, get(http_list_items))
        .route(REORDER_ROUTE, post(http_reorder_items))
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .layer(cors_layer(settings)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(settings: &Settings) -> anyhow::Result<CorsLayer> {
    if settings.cors_permissive {
        warn!("CORS: permissive mode enabled, all origins allowed");
        return Ok(CorsLayer::permissive());
    }

    let origins = settings
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin '{origin}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, starting shutdown"),
        _ = terminate => info!("received SIGTERM, starting shutdown"),
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_failure(err: ApiError) -> HttpError {
    (status_for(err.code), Json(err))
}

fn payload_rejection(rejection: JsonRejection) -> HttpError {
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ApiError::new(
            ErrorCode::Validation,
            format!("Invalid payload: {}", rejection.body_text()),
        )),
    )
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    health(&state.api).await.map_err(api_failure)?;
    Ok("ok")
}

async fn http_list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, HttpError> {
    list_items(&state.api).await.map(Json).map_err(api_failure)
}

async fn http_reorder_items(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<ReorderResponse>, HttpError> {
    let Json(req) = payload.map_err(payload_rejection)?;
    reorder_items(&state.api, &req)
        .await
        .map(Json)
        .map_err(api_failure)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
