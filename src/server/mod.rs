pub mod request;
pub mod response;

pub use request::read_import_request;
pub use response::{ErrorBody, ImportResponse};

use crate::import::run_import;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/targets", get(targets))
        .route("/csv/import", post(import_csv))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn serve(state: AppState, bind_addr: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        targets = state.registry.len(),
        "HTTP server listening on http://{}",
        addr
    );
    tracing::info!("  POST /csv/import - Validate a CSV upload and map it onto a target");
    tracing::info!("  GET  /targets    - Registered targets");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn info(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Validates CSV uploads and maps their rows onto registered targets",
        "endpoints": {
            "GET /health": "Health check",
            "GET /info": "Server info",
            "GET /targets": "Registered targets and their fields",
            "POST /csv/import": "Import a CSV (multipart fields: csv, map_to, mappings)"
        }
    }))
}

async fn targets(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "data": state.registry.targets() }))
}

async fn import_csv(State(state): State<AppState>, request: Request) -> impl IntoResponse {
    let import_request = read_import_request(request, &state, state.max_upload_bytes).await;
    let result = run_import(&state, &import_request);

    if let Err(e) = &result {
        tracing::warn!(
            code = e.code(),
            map_to = import_request.map_to.as_deref().unwrap_or_default(),
            "CSV import rejected: {}",
            e
        );
    }

    ImportResponse::from(result)
}
