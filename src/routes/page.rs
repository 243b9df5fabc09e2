use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::time::Instant;

use crate::app::VisitApp;
use crate::error::AppError;
use crate::list::ListItem;
use crate::map::MapStatus;
use crate::models::VisitType;
use crate::AppState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    items: Vec<ListItem>,
    form: FormView,
    map_json: String,
    map_status: &'static str,
    notice: Option<String>,
    sorted: bool,
    static_hash: &'static str,
}

struct FormView {
    visible: bool,
    /// Milliseconds until the form may be displayed again.
    restore_ms: Option<u128>,
    lat: String,
    lng: String,
    is_cafe: bool,
    place_name: String,
    time_spent: String,
    rating: String,
    activities: String,
}

impl FormView {
    fn from_app(app: &VisitApp, now: Instant) -> Self {
        let form = app.form();
        let draft = form.draft();
        let (lat, lng) = form
            .clicked_at()
            .map(|at| (at.lat().to_string(), at.lng().to_string()))
            .unwrap_or_default();

        Self {
            visible: form.is_visible(),
            restore_ms: form.restore_remaining(now).map(|left| left.as_millis()),
            lat,
            lng,
            is_cafe: form.visit_type() == VisitType::Cafe,
            place_name: draft.place_name.clone(),
            time_spent: draft.time_spent.clone(),
            rating: draft.rating.clone(),
            activities: draft.activities.clone(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut app = state.app.lock().await;
    let notice = app.take_notice();

    let map_status = match app.map().status() {
        MapStatus::Pending => "pending",
        MapStatus::Unavailable => "unavailable",
        MapStatus::Ready { .. } => "ready",
    };

    let template = IndexTemplate {
        items: app.list().items().to_vec(),
        form: FormView::from_app(&app, Instant::now()),
        map_json: serde_json::to_string(app.map())?,
        map_status,
        notice,
        sorted: app.is_sorted(),
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}
