use agenda_core::ids::{ActivityId, CategoryId, LocationId};
use agenda_core::payload::ActivityPayload;
use agenda_core::recurrence::parse_date;
use agenda_core::service::{Agenda, DeleteScope};
use agenda_core::store::Repository;
use agenda_core::user::User;
use anyhow::Result;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;

use crate::render::{Catalog, pluralize, render_agenda};

#[derive(Subcommand)]
pub enum ActivityCommand {
    /// Create an activity (or a recurring series with --repeat)
    Add(ActivityArgs),
    /// Replace an activity; a recurring one is regenerated as a whole series
    Edit {
        id: u64,
        #[command(flatten)]
        args: ActivityArgs,
    },
    /// List activities, grouped by day
    List {
        /// Only activities on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only activities on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show one activity
    Show {
        id: u64,

        #[arg(long)]
        json: bool,
    },
    /// Delete an activity
    Delete {
        id: u64,

        /// Delete every occurrence of its series
        #[arg(long)]
        series: bool,
    },
}

#[derive(Args, Debug)]
pub struct ActivityArgs {
    title: String,

    /// Date (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// Last day of a multi-day activity (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,

    /// Time of day, "HH:MM" or "HH:MM-HH:MM"
    #[arg(short, long)]
    time: Option<String>,

    #[arg(long)]
    all_day: bool,

    /// Location id
    #[arg(short, long)]
    location: Option<u64>,

    /// Category id (repeatable)
    #[arg(short, long = "category")]
    categories: Vec<u64>,

    #[arg(long)]
    notes: Option<String>,

    /// Display color, e.g. "#3366ff"
    #[arg(long)]
    color: Option<String>,

    /// Repeat daily, weekly, monthly or annually
    #[arg(short, long, requires = "until")]
    repeat: Option<String>,

    /// Last date of the series (YYYY-MM-DD)
    #[arg(short, long, requires = "repeat")]
    until: Option<String>,
}

impl ActivityArgs {
    pub fn to_payload(&self) -> ActivityPayload {
        ActivityPayload {
            title: self.title.clone(),
            date: self.date.clone(),
            end_date: self.end_date.clone(),
            time: self.time.clone(),
            location_id: self.location.map(LocationId),
            category_ids: self.categories.iter().copied().map(CategoryId).collect(),
            notes: self.notes.clone(),
            is_all_day: self.all_day,
            color: self.color.clone(),
            is_recurring: self.repeat.is_some(),
            recurrence_type: self.repeat.clone(),
            recurrence_end_date: self.until.clone(),
        }
    }
}

pub fn run<R: Repository>(agenda: &Agenda<R>, user: &User, command: ActivityCommand) -> Result<()> {
    match command {
        ActivityCommand::Add(args) => {
            let ids = agenda.create_activity(user, &args.to_payload())?;
            println!(
                "{}",
                format!(
                    "  Created: {} ({} {})",
                    args.title.trim(),
                    ids.len(),
                    pluralize("occurrence", ids.len())
                )
                .green()
            );
        }
        ActivityCommand::Edit { id, args } => {
            let ids = agenda.update_activity(user, ActivityId(id), &args.to_payload())?;
            println!(
                "{}",
                format!(
                    "  Updated: {} ({} {})",
                    args.title.trim(),
                    ids.len(),
                    pluralize("occurrence", ids.len())
                )
                .yellow()
            );
        }
        ActivityCommand::List { from, to, json } => list(agenda, from, to, json)?,
        ActivityCommand::Show { id, json } => {
            let activity = agenda.activity(ActivityId(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&activity)?);
            } else {
                let catalog = Catalog::new(agenda.categories()?, agenda.locations()?);
                for line in render_agenda(std::slice::from_ref(&activity), &catalog) {
                    println!("{}", line);
                }
                if let Some(notes) = &activity.occurrence.notes {
                    println!("  {}", notes.dimmed());
                }
            }
        }
        ActivityCommand::Delete { id, series } => {
            let scope = if series {
                DeleteScope::Series
            } else {
                DeleteScope::Single
            };
            let removed = agenda.delete_activity(user, ActivityId(id), scope)?;
            println!(
                "{}",
                format!("  Deleted {} {}", removed, pluralize("activity", removed)).red()
            );
        }
    }
    Ok(())
}

fn list<R: Repository>(
    agenda: &Agenda<R>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let from = from.as_deref().map(parse_date).transpose()?;
    let to = to.as_deref().map(parse_date).transpose()?;

    let activities = match (from, to) {
        (None, None) => agenda.activities()?,
        (from, to) => agenda.activities_between(
            from.unwrap_or(chrono::NaiveDate::MIN),
            to.unwrap_or(chrono::NaiveDate::MAX),
        )?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&activities)?);
        return Ok(());
    }

    if activities.is_empty() {
        println!("{}", "No activities found".dimmed());
        return Ok(());
    }

    let catalog = Catalog::new(agenda.categories()?, agenda.locations()?);
    for line in render_agenda(&activities, &catalog) {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ActivityArgs,
    }

    fn parse(argv: &[&str]) -> Result<ActivityArgs, clap::Error> {
        Harness::try_parse_from(std::iter::once("agenda").chain(argv.iter().copied()))
            .map(|h| h.args)
    }

    #[test]
    fn test_recurring_args_to_payload() {
        let args = parse(&[
            "Conversation",
            "--date",
            "2025-01-31",
            "--time",
            "18:00-19:30",
            "-c",
            "1",
            "-c",
            "3",
            "--location",
            "2",
            "--repeat",
            "monthly",
            "--until",
            "2025-04-30",
        ])
        .unwrap();

        let payload = args.to_payload();
        assert!(payload.is_recurring);
        assert_eq!(payload.category_ids, vec![CategoryId(1), CategoryId(3)]);
        assert_eq!(payload.location_id, Some(LocationId(2)));

        let validated = payload.validate().unwrap();
        assert_eq!(validated.recurrence.unwrap().dates().len(), 4);
    }

    #[test]
    fn test_repeat_requires_until() {
        assert!(parse(&["Yoga", "--date", "2025-01-01", "--repeat", "weekly"]).is_err());
        assert!(parse(&["Yoga", "--date", "2025-01-01", "--until", "2025-02-01"]).is_err());
    }

    #[test]
    fn test_single_args_to_payload() {
        let payload = parse(&["Potluck", "-d", "2025-06-01", "--all-day"])
            .unwrap()
            .to_payload();
        assert!(!payload.is_recurring);
        assert!(payload.is_all_day);
        assert_eq!(payload.recurrence_type, None);
    }
}
