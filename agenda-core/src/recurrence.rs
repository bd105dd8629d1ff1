//! Recurrence date generation.
//!
//! Produces the full, materialized series of occurrence dates for one of the
//! four fixed frequencies. Month and year steps clamp to the last valid day of
//! the target month, and every step starts from the previously produced date,
//! so a clamped day carries forward (Jan 31 -> Feb 28 -> Mar 28).

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};

/// How often a recurring activity repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Annually,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Annually,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Annually => "annually",
        }
    }

    /// The date one step after `date`, or None past the end of the calendar.
    ///
    /// Months are clamped to the target month's length by chrono, which uses
    /// the Gregorian leap-year rule.
    pub fn step(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => date.checked_add_days(Days::new(1)),
            Frequency::Weekly => date.checked_add_days(Days::new(7)),
            Frequency::Monthly => date.checked_add_months(Months::new(1)),
            Frequency::Annually => date.checked_add_months(Months::new(12)),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| {
                let expected: Vec<_> = Frequency::ALL.iter().map(|f| f.as_str()).collect();
                AgendaError::InvalidRule(format!(
                    "unknown frequency '{}', expected one of {}",
                    s,
                    expected.join(", ")
                ))
            })
    }
}

impl TryFrom<String> for Frequency {
    type Error = AgendaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A (frequency, start, end) triple defining a repeating series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        RecurrenceRule {
            frequency,
            start_date,
            end_date,
        }
    }

    /// Build a rule from its string form (ISO-8601 dates, frequency name).
    pub fn parse(start_date: &str, frequency: &str, end_date: &str) -> AgendaResult<Self> {
        Ok(RecurrenceRule {
            frequency: frequency.parse()?,
            start_date: parse_date(start_date)?,
            end_date: parse_date(end_date)?,
        })
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        generate_dates(self.start_date, self.frequency, self.end_date)
    }

    /// Lazily step through the rule's dates.
    pub fn iter(&self) -> DateSeries {
        DateSeries {
            next: Some(self.start_date),
            frequency: self.frequency,
            end_date: self.end_date,
        }
    }
}

/// Iterator over the dates of a [`RecurrenceRule`].
///
/// Yields `start_date` first, then one step at a time until the next step
/// would pass `end_date` or the end of the calendar.
#[derive(Debug, Clone)]
pub struct DateSeries {
    next: Option<NaiveDate>,
    frequency: Frequency,
    end_date: NaiveDate,
}

impl Iterator for DateSeries {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.take()?;
        // A step past NaiveDate::MAX is necessarily past end_date too.
        self.next = self
            .frequency
            .step(current)
            .filter(|next| *next <= self.end_date);
        Some(current)
    }
}

/// Generate every occurrence date from `start_date` through `end_date`.
///
/// The result always begins with `start_date`, even when `end_date` is
/// earlier than it, and never contains a date after `end_date`.
pub fn generate_dates(
    start_date: NaiveDate,
    frequency: Frequency,
    end_date: NaiveDate,
) -> Vec<NaiveDate> {
    let dates: Vec<_> = RecurrenceRule::new(frequency, start_date, end_date)
        .iter()
        .collect();

    tracing::debug!(
        %start_date,
        %end_date,
        %frequency,
        count = dates.len(),
        "generated recurrence dates"
    );

    dates
}

/// String form of [`generate_dates`]: ISO-8601 dates in and out.
pub fn generate_iso_dates(
    start_date: &str,
    frequency: &str,
    end_date: &str,
) -> AgendaResult<Vec<String>> {
    let rule = RecurrenceRule::parse(start_date, frequency, end_date)?;
    Ok(rule
        .dates()
        .into_iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect())
}

/// Parse a YYYY-MM-DD date.
pub fn parse_date(s: &str) -> AgendaResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AgendaError::InvalidDate(s.to_string()))
}
