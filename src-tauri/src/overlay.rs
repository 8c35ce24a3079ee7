use axum::{
    extract::{Path as AxumPath, State as AxumState},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, get_service},
    Router,
};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::artifacts::artifact_content_type;
use crate::types::{OverlayServerState, ARTIFACT_ROUTE};

pub fn overlay_router(state: OverlayServerState, static_dir: PathBuf) -> Router {
    let static_files = get_service(ServeDir::new(static_dir));

    Router::new()
        .route("/state.json", get(get_bracket_state_json))
        .route(&format!("{ARTIFACT_ROUTE}/:handle"), get(get_artifact))
        .fallback_service(static_files)
        .with_state(state)
}

pub async fn start_overlay_server(state: OverlayServerState, static_dir: PathBuf, addr: String) {
    let app = overlay_router(state, static_dir);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Overlay server failed to bind {addr}: {e}");
            return;
        }
    };
    info!("Overlay server listening at http://{addr}/");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Overlay server error: {e}");
    }
}

pub async fn get_bracket_state_json(AxumState(state): AxumState<OverlayServerState>) -> impl IntoResponse {
    let payload = {
        let guard = state.session.lock().unwrap_or_else(|e| e.into_inner());
        guard.state()
    };
    let body = serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string());
    (
        [
            ("Content-Type", "application/json"),
            ("Cache-Control", "no-store"),
            ("Pragma", "no-cache"),
            ("Expires", "0"),
        ],
        body,
    )
}

pub async fn get_artifact(
    AxumState(state): AxumState<OverlayServerState>,
    AxumPath(handle): AxumPath<String>,
) -> Response {
    let path = {
        let guard = state.session.lock().unwrap_or_else(|e| e.into_inner());
        guard.artifacts().resolve(&handle).cloned()
    };
    let path = match path {
        Some(path) => path,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, artifact_content_type(&path)),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!("Artifact {handle} unreadable at {}: {e}", path.display());
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
