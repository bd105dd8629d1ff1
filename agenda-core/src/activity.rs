//! Activity templates, occurrences and stored activity records.
//!
//! A template is the immutable snapshot of what a create/update request asked
//! for. Expanding it over a date series stamps out one occurrence per date;
//! the repository later gives each occurrence an id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};
use crate::ids::{ActivityId, CategoryId, LocationId, SeriesId};
use crate::recurrence::{Frequency, RecurrenceRule};

/// Time-of-day range, written "HH:MM" or "HH:MM-HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: Option<NaiveTime>) -> AgendaResult<Self> {
        if let Some(end) = end.filter(|end| *end < start) {
            return Err(AgendaError::validation(
                "time",
                format!(
                    "end {} is before start {}",
                    end.format("%H:%M"),
                    start.format("%H:%M")
                ),
            ));
        }
        Ok(TimeRange { start, end })
    }
}

fn parse_time(s: &str) -> AgendaResult<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| AgendaError::validation("time", format!("'{}' is not HH:MM", s.trim())))
}

impl FromStr for TimeRange {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((start, end)) => TimeRange::new(parse_time(start)?, Some(parse_time(end)?)),
            None => TimeRange::new(parse_time(s)?, None),
        }
    }
}

impl TryFrom<String> for TimeRange {
    type Error = AgendaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.start.format("%H:%M"))?;
        if let Some(end) = self.end {
            write!(f, "-{}", end.format("%H:%M"))?;
        }
        Ok(())
    }
}

/// Everything needed to stamp out an activity on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTemplate {
    pub title: String,
    pub start_date: NaiveDate,
    /// Last day of a multi-day activity
    pub end_date: Option<NaiveDate>,
    pub time: Option<TimeRange>,
    pub is_all_day: bool,
    pub location_id: Option<LocationId>,
    pub category_ids: Vec<CategoryId>,
    pub notes: Option<String>,
    pub color: Option<String>,
}

impl ActivityTemplate {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        ActivityTemplate {
            title: title.into(),
            start_date,
            end_date: None,
            time: None,
            is_all_day: false,
            location_id: None,
            category_ids: Vec::new(),
            notes: None,
            color: None,
        }
    }

    /// Days between start and end date (0 for single-day activities).
    pub fn span_days(&self) -> i64 {
        self.end_date
            .map(|end| (end - self.start_date).num_days())
            .unwrap_or(0)
    }

    fn occurrence_on(&self, date: NaiveDate) -> AgendaResult<Occurrence> {
        let end_date = match self.end_date {
            Some(_) => Some(
                date.checked_add_signed(Duration::days(self.span_days()))
                    .ok_or_else(|| {
                        AgendaError::DateOutOfRange(format!(
                            "end of '{}' occurrence starting {}",
                            self.title, date
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(Occurrence {
            date,
            end_date,
            title: self.title.clone(),
            time: self.time,
            is_all_day: self.is_all_day,
            location_id: self.location_id,
            category_ids: self.category_ids.clone(),
            notes: self.notes.clone(),
            color: self.color.clone(),
        })
    }
}

/// One concrete dated instance of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub title: String,
    pub time: Option<TimeRange>,
    pub is_all_day: bool,
    pub location_id: Option<LocationId>,
    pub category_ids: Vec<CategoryId>,
    pub notes: Option<String>,
    pub color: Option<String>,
}

impl Occurrence {
    /// Last day the occurrence covers.
    pub fn last_day(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.date)
    }
}

/// Stamp out one occurrence per date, in order, preserving the template's
/// multi-day span on each of them.
pub fn expand_template(
    template: &ActivityTemplate,
    dates: &[NaiveDate],
) -> AgendaResult<Vec<Occurrence>> {
    dates
        .iter()
        .map(|date| template.occurrence_on(*date))
        .collect()
}

/// Parse `frequency`, generate the series from the template's start date
/// through `until` and expand the template over it.
///
/// An unknown frequency fails before anything is generated.
pub fn expand_rule(
    template: &ActivityTemplate,
    frequency: &str,
    until: NaiveDate,
) -> AgendaResult<Vec<Occurrence>> {
    let frequency: Frequency = frequency.parse()?;
    let rule = RecurrenceRule::new(frequency, template.start_date, until);
    expand_template(template, &rule.dates())
}

/// Recurrence bookkeeping carried by every activity of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: SeriesId,
    pub frequency: Frequency,
    pub until: NaiveDate,
}

/// An occurrence ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub occurrence: Occurrence,
    pub series: Option<Series>,
}

/// A stored activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    #[serde(flatten)]
    pub occurrence: Occurrence,
    pub series: Option<Series>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    pub fn is_recurring(&self) -> bool {
        self.series.is_some()
    }

    /// Whether the activity covers any day in `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.occurrence.date <= to && self.occurrence.last_day() >= from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn workshop() -> ActivityTemplate {
        ActivityTemplate {
            title: "Pottery workshop".to_string(),
            start_date: d(2025, 1, 1),
            end_date: Some(d(2025, 1, 3)),
            time: Some("14:00-16:30".parse().unwrap()),
            is_all_day: false,
            location_id: Some(LocationId(2)),
            category_ids: vec![CategoryId(1), CategoryId(4)],
            notes: Some("Bring an apron".to_string()),
            color: Some("#aa3300".to_string()),
        }
    }

    #[test]
    fn test_expand_preserves_multi_day_span() {
        let template = workshop();
        let dates = [d(2025, 1, 1), d(2025, 1, 8), d(2025, 1, 15)];

        let occurrences = expand_template(&template, &dates).unwrap();

        let pairs: Vec<_> = occurrences.iter().map(|o| (o.date, o.end_date)).collect();
        assert_eq!(
            pairs,
            vec![
                (d(2025, 1, 1), Some(d(2025, 1, 3))),
                (d(2025, 1, 8), Some(d(2025, 1, 10))),
                (d(2025, 1, 15), Some(d(2025, 1, 17))),
            ]
        );
    }

    #[test]
    fn test_expand_copies_template_fields() {
        let template = workshop();
        let occurrences = expand_template(&template, &[d(2025, 2, 5)]).unwrap();

        let occ = &occurrences[0];
        assert_eq!(occ.title, template.title);
        assert_eq!(occ.time, template.time);
        assert_eq!(occ.location_id, template.location_id);
        assert_eq!(occ.category_ids, template.category_ids);
        assert_eq!(occ.notes, template.notes);
        assert_eq!(occ.color, template.color);
        assert!(!occ.is_all_day);
    }

    #[test]
    fn test_expand_single_day_template_has_no_end_date() {
        let template = ActivityTemplate::new("Choir", d(2025, 3, 3));
        let occurrences = expand_template(&template, &[d(2025, 3, 3), d(2025, 3, 10)]).unwrap();
        assert!(occurrences.iter().all(|o| o.end_date.is_none()));
        assert_eq!(occurrences[1].last_day(), d(2025, 3, 10));
    }

    #[test]
    fn test_expand_empty_dates() {
        assert!(expand_template(&workshop(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_expand_end_past_calendar_is_out_of_range() {
        let mut template = ActivityTemplate::new("Forever", d(2025, 1, 1));
        template.end_date = Some(d(2025, 1, 2));

        let err = expand_template(&template, &[NaiveDate::MAX]).unwrap_err();
        assert!(matches!(err, AgendaError::DateOutOfRange(_)));
    }

    #[test]
    fn test_expand_rule_weekly() {
        let occurrences = expand_rule(&workshop(), "weekly", d(2025, 1, 15)).unwrap();
        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences[2].end_date, Some(d(2025, 1, 17)));
    }

    #[test]
    fn test_expand_rule_unknown_frequency() {
        let err = expand_rule(&workshop(), "every other tuesday", d(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, AgendaError::InvalidRule(_)));
    }

    #[test]
    fn test_time_range_parse() {
        let range: TimeRange = "09:30-11:00".parse().unwrap();
        assert_eq!(range.start, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(range.end, NaiveTime::from_hms_opt(11, 0, 0));
        assert_eq!(range.to_string(), "09:30-11:00");

        let open: TimeRange = "18:00".parse().unwrap();
        assert_eq!(open.end, None);
        assert_eq!(open.to_string(), "18:00");
    }

    #[test]
    fn test_time_range_rejects_reversed_and_garbage() {
        assert!(matches!(
            "11:00-09:00".parse::<TimeRange>(),
            Err(AgendaError::Validation { .. })
        ));
        assert!("noon".parse::<TimeRange>().is_err());
        assert!("25:00".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_activity_overlaps() {
        let occurrence = expand_template(&workshop(), &[d(2025, 1, 8)]).unwrap().remove(0);
        let now = Utc::now();
        let activity = Activity {
            id: ActivityId(1),
            occurrence,
            series: None,
            created_at: now,
            updated_at: now,
        };

        assert!(activity.overlaps(d(2025, 1, 10), d(2025, 1, 20)));
        assert!(activity.overlaps(d(2025, 1, 1), d(2025, 1, 8)));
        assert!(!activity.overlaps(d(2025, 1, 11), d(2025, 1, 20)));
        assert!(!activity.is_recurring());
    }

    #[test]
    fn test_activity_json_is_flat() {
        let occurrence = ActivityTemplate::new("Yoga", d(2025, 4, 2))
            .occurrence_on(d(2025, 4, 2))
            .unwrap();
        let now = Utc::now();
        let activity = Activity {
            id: ActivityId(9),
            occurrence,
            series: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["id"], 9);
        assert_eq!(value["title"], "Yoga");
        assert_eq!(value["date"], "2025-04-02");

        let back: Activity = serde_json::from_value(value).unwrap();
        assert_eq!(back, activity);
    }
}
