use agenda_core::service::Agenda;
use agenda_core::store::Repository;
use agenda_core::user::User;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run<R: Repository>(agenda: &Agenda<R>, user: &User) -> Result<()> {
    let report = agenda.seed_defaults(user)?;

    if report.is_empty() {
        println!("{}", "Defaults already present".dimmed());
        return Ok(());
    }

    for category in &report.categories {
        println!("{} category {}", "+".green(), category.render());
    }
    for location in &report.locations {
        println!("{} location {}", "+".green(), location.render());
    }

    Ok(())
}
