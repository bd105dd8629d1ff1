//! Core of agenda: scheduling and publishing recurring community activities.
//!
//! - `recurrence` generates the dates of a daily/weekly/monthly/annual series
//! - `activity` stamps an activity template out over those dates
//! - `payload` validates incoming requests into typed templates and rules
//! - `store` and `service` persist and manage activities, categories and locations

pub mod activity;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod payload;
pub mod recurrence;
pub mod service;
pub mod store;
pub mod user;

pub use activity::{ActivityTemplate, Occurrence, expand_rule, expand_template};
pub use error::{AgendaError, AgendaResult};
pub use recurrence::{Frequency, RecurrenceRule, generate_dates, generate_iso_dates};
