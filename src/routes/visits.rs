use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    routing::post,
    Form, Router,
};
use serde::Deserialize;

use crate::app::SAVE_FAILED;
use crate::form::FormValues;
use crate::models::VisitType;
use crate::AppState;

#[derive(Deserialize)]
pub struct TypeForm {
    #[serde(rename = "type")]
    visit_type: VisitType,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/visits", post(create_visit))
        .route("/visits/{id}/activate", post(activate_visit))
        .route("/form/type", post(select_type))
        .route("/sort", post(toggle_sort))
        .route("/reset", post(reset))
}

async fn create_visit(
    State(state): State<AppState>,
    Form(form): Form<FormValues>,
) -> impl IntoResponse {
    let mut app = state.app.lock().await;
    if let Err(e) = app.submit(form).await {
        tracing::error!("Saving new visit failed: {e}");
        app.notify(SAVE_FAILED);
    }
    Redirect::to("/")
}

async fn activate_visit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut app = state.app.lock().await;
    if let Err(e) = app.activate(&id).await {
        tracing::error!("Saving click count failed: {e}");
        app.notify(SAVE_FAILED);
    }
    Redirect::to("/")
}

async fn select_type(
    State(state): State<AppState>,
    Form(form): Form<TypeForm>,
) -> impl IntoResponse {
    state.app.lock().await.select_type(form.visit_type);
    Redirect::to("/")
}

async fn toggle_sort(State(state): State<AppState>) -> impl IntoResponse {
    state.app.lock().await.toggle_sort();
    Redirect::to("/")
}

async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    let mut app = state.app.lock().await;
    if let Err(e) = app.reset().await {
        tracing::error!("Reset failed: {e}");
        app.notify("Could not clear your visits");
    }
    Redirect::to("/")
}
