use agenda_core::ids::{CategoryId, LocationId};
use agenda_core::payload::NamePayload;
use agenda_core::service::Agenda;
use agenda_core::store::Repository;
use agenda_core::user::User;
use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;

use crate::render::Render;

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List all entries
    List,
    /// Add an entry
    Add { name: String },
    /// Rename an entry
    Rename { id: u64, name: String },
    /// Delete an entry (refused while activities use it)
    Delete { id: u64 },
}

pub fn run_categories<R: Repository>(
    agenda: &Agenda<R>,
    user: &User,
    command: CatalogCommand,
) -> Result<()> {
    match command {
        CatalogCommand::List => print_list(&agenda.categories()?, "No categories"),
        CatalogCommand::Add { name } => {
            let category = agenda.create_category(user, &NamePayload::new(name))?;
            println!("{} {}", "Created:".green(), category.render());
        }
        CatalogCommand::Rename { id, name } => {
            let category = agenda.rename_category(user, CategoryId(id), &NamePayload::new(name))?;
            println!("{} {}", "Renamed:".yellow(), category.render());
        }
        CatalogCommand::Delete { id } => {
            agenda.delete_category(user, CategoryId(id))?;
            println!("{}", format!("Deleted category {}", id).red());
        }
    }
    Ok(())
}

pub fn run_locations<R: Repository>(
    agenda: &Agenda<R>,
    user: &User,
    command: CatalogCommand,
) -> Result<()> {
    match command {
        CatalogCommand::List => print_list(&agenda.locations()?, "No locations"),
        CatalogCommand::Add { name } => {
            let location = agenda.create_location(user, &NamePayload::new(name))?;
            println!("{} {}", "Created:".green(), location.render());
        }
        CatalogCommand::Rename { id, name } => {
            let location = agenda.rename_location(user, LocationId(id), &NamePayload::new(name))?;
            println!("{} {}", "Renamed:".yellow(), location.render());
        }
        CatalogCommand::Delete { id } => {
            agenda.delete_location(user, LocationId(id))?;
            println!("{}", format!("Deleted location {}", id).red());
        }
    }
    Ok(())
}

fn print_list<T: Render>(items: &[T], empty: &str) {
    if items.is_empty() {
        println!("{}", empty.dimmed());
    }
    for item in items {
        println!("{}", item.render());
    }
}
