use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    routing::post,
    Form, Router,
};
use serde::Deserialize;

use crate::models::Coords;
use crate::AppState;

#[derive(Deserialize)]
pub struct PointForm {
    lat: f64,
    lng: f64,
}

impl PointForm {
    fn coords(&self) -> Coords {
        Coords::new(self.lat, self.lng)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/position", post(position_found))
        .route("/position/denied", post(position_denied))
        .route("/map/click", post(map_clicked))
}

async fn position_found(
    State(state): State<AppState>,
    Form(form): Form<PointForm>,
) -> impl IntoResponse {
    state.app.lock().await.locate(form.coords());
    Redirect::to("/")
}

async fn position_denied(State(state): State<AppState>) -> impl IntoResponse {
    state.app.lock().await.location_failed();
    Redirect::to("/")
}

async fn map_clicked(
    State(state): State<AppState>,
    Form(form): Form<PointForm>,
) -> impl IntoResponse {
    state.app.lock().await.map_clicked(form.coords());
    Redirect::to("/")
}
