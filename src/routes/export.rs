use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::error::AppError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/export", get(export_data))
}

/// The stored visit list as a JSON download, in the same shape the browser
/// store used, so it can be fed back through `placelog import`.
async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.store.raw().await?.unwrap_or_else(|| "[]".to_string());

    let filename = format!("placelog-export-{}.json", chrono::Local::now().format("%Y-%m-%d"));
    let content_disposition = format!("attachment; filename=\"{}\"", filename);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&content_disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((headers, body))
}
