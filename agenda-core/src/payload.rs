//! Request payloads and their validation.
//!
//! Payloads mirror the JSON accepted by the activity API. Nothing reaches the
//! recurrence engine or a repository until it has been turned into a typed
//! [`ActivityTemplate`] / [`RecurrenceRule`] here.

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityTemplate, TimeRange};
use crate::error::{AgendaError, AgendaResult};
use crate::ids::{CategoryId, LocationId};
use crate::recurrence::{Frequency, RecurrenceRule, parse_date};

const MAX_TITLE_LEN: usize = 128;
const MAX_NAME_LEN: usize = 64;

/// Create/update payload for an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityPayload {
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<String>,
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedActivity {
    pub template: ActivityTemplate,
    pub recurrence: Option<RecurrenceRule>,
}

impl ActivityPayload {
    pub fn from_json(json: &str) -> AgendaResult<Self> {
        serde_json::from_str(json).map_err(|e| AgendaError::validation("payload", e.to_string()))
    }

    pub fn validate(&self) -> AgendaResult<ValidatedActivity> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AgendaError::validation("title", "is required"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AgendaError::validation(
                "title",
                format!("must be at most {MAX_TITLE_LEN} characters"),
            ));
        }

        let start_date = parse_date(&self.date)?;

        let end_date = non_empty(&self.end_date).map(parse_date).transpose()?;
        if let Some(end) = end_date.filter(|end| *end < start_date) {
            return Err(AgendaError::validation(
                "end_date",
                format!("{end} is before {start_date}"),
            ));
        }

        // All-day activities have no time of day.
        let time = if self.is_all_day {
            None
        } else {
            non_empty(&self.time).map(str::parse::<TimeRange>).transpose()?
        };

        let color = non_empty(&self.color).map(str::to_string);
        if let Some(color) = color.as_deref().filter(|c| !is_hex_color(c)) {
            return Err(AgendaError::validation(
                "color",
                format!("'{color}' is not a #rgb or #rrggbb color"),
            ));
        }

        let mut category_ids = self.category_ids.clone();
        category_ids.sort();
        category_ids.dedup();

        let template = ActivityTemplate {
            title: title.to_string(),
            start_date,
            end_date,
            time,
            is_all_day: self.is_all_day,
            location_id: self.location_id,
            category_ids,
            notes: non_empty(&self.notes).map(str::to_string),
            color,
        };

        let recurrence = if self.is_recurring {
            let frequency: Frequency = non_empty(&self.recurrence_type)
                .ok_or_else(|| AgendaError::validation("recurrence_type", "is required"))?
                .parse()?;
            let until = non_empty(&self.recurrence_end_date)
                .ok_or_else(|| AgendaError::validation("recurrence_end_date", "is required"))
                .and_then(parse_date)?;
            Some(RecurrenceRule::new(frequency, start_date, until))
        } else {
            None
        };

        Ok(ValidatedActivity {
            template,
            recurrence,
        })
    }
}

/// Create/rename payload for a category or location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamePayload {
    #[serde(default)]
    pub name: String,
}

impl NamePayload {
    pub fn new(name: impl Into<String>) -> Self {
        NamePayload { name: name.into() }
    }

    /// The trimmed name, if acceptable.
    pub fn validate(&self) -> AgendaResult<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AgendaError::validation("name", "is required"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AgendaError::validation(
                "name",
                format!("must be at most {MAX_NAME_LEN} characters"),
            ));
        }
        Ok(name.to_string())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
