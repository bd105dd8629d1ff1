//! Terminal rendering for agenda types.
//!
//! Extension traits that add colored output to agenda-core types using
//! owo_colors.

use std::collections::HashMap;

use agenda_core::activity::Activity;
use agenda_core::catalog::{Category, Location};
use agenda_core::ids::{CategoryId, LocationId};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Category {
    fn render(&self) -> String {
        format!("{} {}", format!("{:>4}", self.id).dimmed(), self.name)
    }
}

impl Render for Location {
    fn render(&self) -> String {
        format!("{} {}", format!("{:>4}", self.id).dimmed(), self.name)
    }
}

/// Names used to label activities with their location and categories.
#[derive(Default)]
pub struct Catalog {
    pub categories: HashMap<CategoryId, String>,
    pub locations: HashMap<LocationId, String>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, locations: Vec<Location>) -> Self {
        Catalog {
            categories: categories.into_iter().map(|c| (c.id, c.name)).collect(),
            locations: locations.into_iter().map(|l| (l.id, l.name)).collect(),
        }
    }
}

/// One line per activity: id, time, title, then where/what/how often.
pub fn render_activity(activity: &Activity, catalog: &Catalog) -> String {
    let occ = &activity.occurrence;

    let time = match (&occ.time, occ.is_all_day) {
        (Some(range), false) => format!("{:>11}", range.to_string()),
        _ => format!("{:>11}", "all-day"),
    };

    let mut line = format!(
        "  {} {} {}",
        format!("#{}", activity.id).dimmed(),
        time.cyan(),
        occ.title
    );

    if let Some(end) = occ.end_date.filter(|end| *end != occ.date) {
        line.push_str(&format!(" (until {})", end.format("%a %b %-d")).dimmed().to_string());
    }
    if let Some(name) = occ.location_id.and_then(|id| catalog.locations.get(&id)) {
        line.push_str(&format!(" @ {name}"));
    }
    if !occ.category_ids.is_empty() {
        let names: Vec<_> = occ
            .category_ids
            .iter()
            .filter_map(|id| catalog.categories.get(id).map(String::as_str))
            .collect();
        if !names.is_empty() {
            line.push_str(&format!(" [{}]", names.join(", ")).dimmed().to_string());
        }
    }
    if let Some(series) = activity.series {
        line.push_str(&format!(" ↻ {}", series.frequency).yellow().to_string());
    }

    line
}

/// Activities grouped under a bold date heading.
pub fn render_agenda(activities: &[Activity], catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for activity in activities {
        let date = activity.occurrence.date;
        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(date.format("%a %b %-d, %Y").to_string().bold().to_string());
            current_date = Some(date);
        }
        lines.push(render_activity(activity, catalog));
    }

    lines
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
