use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

use super::Coords;

/// Discriminator of a visit, as chosen in the form's type select.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitType {
    #[default]
    #[serde(rename = "cafe")]
    Cafe,
    #[serde(rename = "park")]
    Park,
}

impl VisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Cafe => "cafe",
            VisitType::Park => "park",
        }
    }

    /// Icon used for both the marker popup and the list item.
    pub fn emoji(&self) -> &'static str {
        match self {
            VisitType::Cafe => "☕️",
            VisitType::Park => "🌳",
        }
    }

    pub fn popup_class(&self) -> String {
        format!("{}-popup", self.as_str())
    }
}

impl std::fmt::Display for VisitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific part of a visit. Serialized inline next to the common
/// fields, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VisitKind {
    #[serde(rename = "cafe")]
    Cafe { rating: f64 },
    #[serde(rename = "park")]
    Park { activities: String },
}

impl VisitKind {
    pub fn visit_type(&self) -> VisitType {
        match self {
            VisitKind::Cafe { .. } => VisitType::Cafe,
            VisitKind::Park { .. } => VisitType::Park,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "VisitRecord")]
pub struct Visit {
    pub id: String,
    pub date: DateTime<Utc>,
    pub coords: Coords,
    pub place_name: String,
    /// Minutes.
    pub time_spent: f64,
    pub clicks: u32,
    pub description: String,
    #[serde(flatten)]
    pub kind: VisitKind,
}

/// Stored shape of a visit. `description` is not trusted from storage and is
/// derived again when the record becomes a [`Visit`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisitRecord {
    id: String,
    date: DateTime<Utc>,
    coords: Coords,
    place_name: String,
    time_spent: f64,
    #[serde(default)]
    clicks: u32,
    #[serde(flatten)]
    kind: VisitKind,
}

impl From<VisitRecord> for Visit {
    fn from(record: VisitRecord) -> Self {
        let description = describe(&record.place_name, &record.date);
        Self {
            id: record.id,
            date: record.date,
            coords: record.coords,
            place_name: record.place_name,
            time_spent: record.time_spent,
            clicks: record.clicks,
            description,
            kind: record.kind,
        }
    }
}

impl Visit {
    pub fn new(coords: Coords, place_name: String, time_spent: f64, kind: VisitKind) -> Self {
        Self::new_at(Utc::now(), coords, place_name, time_spent, kind)
    }

    pub fn new_at(
        date: DateTime<Utc>,
        coords: Coords,
        place_name: String,
        time_spent: f64,
        kind: VisitKind,
    ) -> Self {
        Self {
            id: next_id(&date),
            description: describe(&place_name, &date),
            date,
            coords,
            place_name,
            time_spent,
            clicks: 0,
            kind,
        }
    }

    pub fn visit_type(&self) -> VisitType {
        self.kind.visit_type()
    }

    pub fn click(&mut self) {
        self.clicks += 1;
    }

    /// Text shown in the marker popup.
    pub fn popup_content(&self) -> String {
        format!("{} {}", self.visit_type().emoji(), self.description)
    }
}

fn describe(place_name: &str, date: &DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    format!("Visit to {} on {}", place_name, local.format("%B %-d"))
}

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

// Ids are the trailing 10 digits of the creation time in milliseconds.
// Stamps are bumped forward so two visits created in the same millisecond
// still get different ids.
fn next_id(date: &DateTime<Utc>) -> String {
    let millis = date.timestamp_millis();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    let stamp = loop {
        let next = millis.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => break next,
            Err(actual) => last = actual,
        }
    };

    let digits = stamp.to_string();
    digits[digits.len().saturating_sub(10)..].to_string()
}
