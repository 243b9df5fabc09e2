//! Application controller: owns the visit list and routes every user event to
//! the map, form, list, and store.

use std::time::Instant;

use crate::config::MapConfig;
use crate::error::AppError;
use crate::form::{self, FormController, FormValues};
use crate::list::ListView;
use crate::map::MapView;
use crate::models::{Coords, Visit, VisitType};
use crate::store::VisitStore;

pub const LOCATION_FAILED: &str = "Could not get your position";
pub const MAP_NOT_READY: &str = "The map is not available, so new visits cannot be placed";
pub const INVALID_POINT: &str = "That point is outside the map";
pub const NO_LOCATION_PICKED: &str = "Click on the map to choose where the visit happened";
pub const SAVE_FAILED: &str = "Could not save your visits";

/// What happened to a submitted form.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Created(String),
    Rejected,
}

pub struct VisitApp {
    store: VisitStore,
    map_config: MapConfig,
    visits: Vec<Visit>,
    sorted: bool,
    map: MapView,
    form: FormController,
    list: ListView,
    notice: Option<String>,
}

impl VisitApp {
    /// Restore persisted visits into the list. The map waits for a position.
    pub async fn start(store: VisitStore, map_config: MapConfig) -> Self {
        let visits = store.load().await;
        tracing::info!(count = visits.len(), "restored visits");

        let mut app = Self {
            store,
            map: MapView::new(&map_config),
            map_config,
            visits,
            sorted: false,
            form: FormController::default(),
            list: ListView::default(),
            notice: None,
        };
        app.render_list();
        app
    }

    /// Geolocation succeeded: build the map and place every known visit.
    pub fn locate(&mut self, position: Coords) {
        if !position.is_valid() {
            tracing::warn!(%position, "ignoring invalid position");
            self.location_failed();
            return;
        }

        self.map.initialize(position, self.map_config.zoom);
        for visit in &self.visits {
            if let Err(e) = self
                .map
                .add_marker(visit.coords, visit.visit_type(), &visit.description)
            {
                tracing::warn!(id = %visit.id, "marker not placed: {e}");
            }
        }
    }

    pub fn location_failed(&mut self) {
        tracing::warn!("geolocation unavailable, map disabled");
        self.map.mark_unavailable();
        self.notify(LOCATION_FAILED);
    }

    pub fn map_clicked(&mut self, at: Coords) {
        if !self.map.is_ready() {
            self.notify(MAP_NOT_READY);
            return;
        }
        if !at.is_valid() {
            tracing::debug!(%at, "ignoring click outside the map");
            self.notify(INVALID_POINT);
            return;
        }
        self.form.show(at);
    }

    pub fn select_type(&mut self, visit_type: VisitType) {
        self.form.toggle_extra_fields(visit_type);
    }

    /// Validate and create a visit. A rejected form stays open with its
    /// values; a store failure is returned after the visit is already shown.
    pub async fn submit(&mut self, values: FormValues) -> Result<Submission, AppError> {
        let Some(at) = self.form.clicked_at() else {
            self.notify(NO_LOCATION_PICKED);
            return Ok(Submission::Rejected);
        };

        let fields = match form::validate_and_extract(&values) {
            Ok(fields) => fields,
            Err(e) => {
                self.form.keep_draft(values);
                self.notify(e.to_string());
                return Ok(Submission::Rejected);
            }
        };

        let visit = Visit::new(at, fields.place_name, fields.time_spent, fields.kind);
        let id = visit.id.clone();
        tracing::info!(id = %id, visit_type = %visit.visit_type(), "created visit");

        if let Err(e) = self
            .map
            .add_marker(visit.coords, visit.visit_type(), &visit.description)
        {
            tracing::warn!("marker not placed: {e}");
        }
        if self.sorted {
            self.visits.insert(0, visit);
            self.render_list();
        } else {
            self.list.render(&visit);
            self.visits.push(visit);
        }
        self.form.toggle_extra_fields(values.visit_type);
        self.form.hide(Instant::now());

        self.persist().await?;
        Ok(Submission::Created(id))
    }

    /// A list item was clicked. Unknown ids are ignored.
    pub async fn activate(&mut self, id: &str) -> Result<(), AppError> {
        let zoom = self.map_config.zoom;
        let Some(visit) = self.visits.iter_mut().find(|v| v.id == id) else {
            tracing::debug!(id, "activated unknown visit");
            return Ok(());
        };

        if let Err(e) = self.map.pan_to(visit.coords, zoom) {
            tracing::debug!("not panning: {e}");
        }
        visit.click();

        self.persist().await
    }

    /// Reverse the list order and re-render the sidebar. Markers stay put.
    pub fn toggle_sort(&mut self) {
        self.sorted = !self.sorted;
        self.visits.reverse();
        self.render_list();
    }

    /// Drop every stored visit and start over from an empty state.
    pub async fn reset(&mut self) -> Result<(), AppError> {
        self.store.clear().await?;
        self.visits.clear();
        self.sorted = false;
        self.map = MapView::new(&self.map_config);
        self.form = FormController::default();
        self.list.clear();
        self.notice = None;
        Ok(())
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// One-shot message for the next page render.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    fn render_list(&mut self) {
        self.list.clear();
        for visit in &self.visits {
            self.list.render(visit);
        }
    }

    // Stored order is always creation order, whatever the sort toggle says.
    async fn persist(&self) -> Result<(), AppError> {
        if self.sorted {
            let mut ordered = self.visits.clone();
            ordered.reverse();
            self.store.save(&ordered).await
        } else {
            self.store.save(&self.visits).await
        }
    }
}
