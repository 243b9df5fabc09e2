use serde::Deserialize;
use std::time::{Duration, Instant};

use crate::models::{Coords, VisitKind, VisitType};

/// How long the form stays out of layout after a successful submit.
pub const DISPLAY_RESTORE_DELAY: Duration = Duration::from_secs(1);

pub const INVALID_NUMBERS: &str = "Inputs have to be positive numbers";

/// Raw form input as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormValues {
    #[serde(rename = "type", default)]
    pub visit_type: VisitType,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub time_spent: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub activities: String,
}

/// Validated fields, ready to become a visit once a location is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitFields {
    pub place_name: String,
    pub time_spent: f64,
    pub kind: VisitKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    InvalidNumbers,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::InvalidNumbers => f.write_str(INVALID_NUMBERS),
        }
    }
}

impl std::error::Error for FormError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Hidden,
    Visible { at: Coords },
}

#[derive(Debug, Clone)]
pub struct FormController {
    state: FormState,
    visit_type: VisitType,
    draft: FormValues,
    restore_at: Option<Instant>,
}

impl Default for FormController {
    fn default() -> Self {
        Self {
            state: FormState::Hidden,
            visit_type: VisitType::default(),
            draft: FormValues::default(),
            restore_at: None,
        }
    }
}

impl FormController {
    /// Reveal the form for a click at `at`. Cancels a pending display restore.
    pub fn show(&mut self, at: Coords) {
        self.state = FormState::Visible { at };
        self.restore_at = None;
    }

    /// Clear the inputs and hide the form. The form stays out of layout until
    /// `now + DISPLAY_RESTORE_DELAY`.
    pub fn hide(&mut self, now: Instant) {
        self.state = FormState::Hidden;
        self.draft = FormValues {
            visit_type: self.visit_type,
            ..FormValues::default()
        };
        self.restore_at = Some(now + DISPLAY_RESTORE_DELAY);
    }

    pub fn toggle_extra_fields(&mut self, visit_type: VisitType) {
        if self.visit_type != visit_type {
            self.draft.rating.clear();
            self.draft.activities.clear();
        }
        self.visit_type = visit_type;
        self.draft.visit_type = visit_type;
    }

    /// Keep what the user typed so a rejected submit does not clear the form.
    pub fn keep_draft(&mut self, values: FormValues) {
        self.visit_type = values.visit_type;
        self.draft = values;
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn clicked_at(&self) -> Option<Coords> {
        match self.state {
            FormState::Visible { at } => Some(at),
            FormState::Hidden => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, FormState::Visible { .. })
    }

    pub fn visit_type(&self) -> VisitType {
        self.visit_type
    }

    pub fn draft(&self) -> &FormValues {
        &self.draft
    }

    /// Time left before the form goes back into layout, if a restore is
    /// pending at `now`.
    pub fn restore_remaining(&self, now: Instant) -> Option<Duration> {
        self.restore_at
            .and_then(|at| at.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }
}

/// Check the numeric fields required by the selected type and extract the
/// visit fields.
pub fn validate_and_extract(values: &FormValues) -> Result<VisitFields, FormError> {
    let time_spent = coerce_number(&values.time_spent);

    let kind = match values.visit_type {
        VisitType::Cafe => {
            let rating = coerce_number(&values.rating);
            if !all_positive(&[time_spent, rating]) {
                return Err(FormError::InvalidNumbers);
            }
            VisitKind::Cafe { rating }
        }
        VisitType::Park => {
            if !all_positive(&[time_spent]) {
                return Err(FormError::InvalidNumbers);
            }
            VisitKind::Park {
                activities: values.activities.clone(),
            }
        }
    };

    Ok(VisitFields {
        place_name: values.place_name.clone(),
        time_spent,
        kind,
    })
}

fn all_positive(inputs: &[f64]) -> bool {
    inputs.iter().all(|n| n.is_finite() && *n > 0.0)
}

// Browser number coercion: blank input is 0, anything unparsable is NaN.
fn coerce_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}
