use agenda_core::generate_iso_dates;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::pluralize;

pub fn run(start: &str, frequency: &str, end: &str, json: bool) -> Result<()> {
    let dates = generate_iso_dates(start, frequency, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dates)?);
        return Ok(());
    }

    for date in &dates {
        println!("{}", date);
    }
    println!(
        "{}",
        format!("{} {}", dates.len(), pluralize("occurrence", dates.len())).dimmed()
    );

    Ok(())
}
