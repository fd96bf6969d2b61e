use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bellwether_shared::StatesDetailDocument;
use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let states_with_sections = state.details.read().await.states.len();
    Json(serde_json::json!({
        "status": "ok",
        "summary_states": state.summary.states.len(),
        "states_with_sections": states_with_sections,
        "active_sessions": state.auth.active_tokens(),
    }))
}

/// `/data/states.json`: the per-state summary records used by the map panel.
pub async fn get_states_summary(State(state): State<AppState>) -> Response {
    match serde_json::to_vec(state.summary.as_ref()) {
        Ok(body) => json_bytes_response(body, "public, max-age=300"),
        Err(e) => {
            warn!(error = %e, "failed to serialize states summary");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_states_detail(State(state): State<AppState>) -> Response {
    let document = state.details.read().await.clone();
    let mut response = Json(document).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// Full replacement of the detail document. The new document is persisted
/// before it becomes visible to readers.
pub async fn update_states_detail(
    _session: Authenticated,
    State(state): State<AppState>,
    Json(mut document): Json<StatesDetailDocument>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Err((name, e)) = document.validate() {
        return Err(ApiError::BadRequest(format!("{name}: {e}")));
    }
    document.last_updated = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut current = state.details.write().await;
    state.store.save_details(&document).await?;
    let last_updated = document.last_updated.clone();
    let states = document.states.len();
    *current = document;
    drop(current);

    info!(states, %last_updated, "states detail updated");
    Ok(Json(serde_json::json!({
        "message": "States detail updated",
        "lastUpdated": last_updated,
    })))
}

pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

fn json_bytes_response(body: Vec<u8>, cache_control: &'static str) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
    response
}
