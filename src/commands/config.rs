use agenda_core::config::AgendaConfig;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(config: &AgendaConfig) -> Result<()> {
    let config_path = AgendaConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_path().display());
    println!();
    println!("{}", "Settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
