//! Agenda configuration.
//!
//! Read from ~/.config/agenda/config.toml (created with commented defaults
//! on first use), then overridden by `AGENDA_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};
use crate::user::{Role, User};

static DEFAULT_DATA_DIR: &str = "~/.local/share/agenda";
static DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_MAX_OCCURRENCES: usize = 1000;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_max_occurrences() -> usize {
    DEFAULT_MAX_OCCURRENCES
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_role() -> Role {
    Role::Admin
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    /// Where agenda.json lives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// tracing filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Longest recurring series a single request may create
    #[serde(default = "default_max_occurrences")]
    pub max_occurrences: usize,

    /// Identity the command line acts as
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_role")]
    pub role: Role,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            max_occurrences: default_max_occurrences(),
            username: default_username(),
            role: default_role(),
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating it if missing) plus environment overrides.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path, None)
    }

    /// Load from `path`, with `AGENDA_*` overrides taken from `env` when given
    /// or from the process environment otherwise.
    pub fn load_from(path: &Path, env: Option<Map<String, String>>) -> AgendaResult<Self> {
        let config: AgendaConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("AGENDA")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))?;

        if config.max_occurrences == 0 {
            return Err(AgendaError::Config(
                "max_occurrences must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// The user the command line acts as.
    pub fn user(&self) -> User {
        User::new(self.username.clone(), self.role)
    }

    pub fn to_toml(&self) -> AgendaResult<String> {
        toml::to_string_pretty(self).map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Where activities, categories and locations are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Log filter when RUST_LOG is unset (error, warn, info, debug, trace):
# log_level = \"{DEFAULT_LOG_LEVEL}\"

# Longest recurring series a single activity may expand to:
# max_occurrences = {DEFAULT_MAX_OCCURRENCES}

# Who the command line acts as (admin, editor or viewer):
# username = \"admin\"
# role = \"admin\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    #[test]
    fn test_default_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda/config.toml");

        AgendaConfig::create_default_config(&path).unwrap();
        let config = AgendaConfig::load_from(&path, no_env()).unwrap();

        assert_eq!(config, AgendaConfig::default());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            AgendaConfig::load_from(&dir.path().join("absent.toml"), no_env()).unwrap();
        assert_eq!(config.max_occurrences, 1000);
        assert_eq!(config.user(), User::new("admin", Role::Admin));
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/agenda\"\nmax_occurrences = 52\nusername = \"marie\"\nrole = \"editor\"\n",
        )
        .unwrap();

        let config = AgendaConfig::load_from(&path, no_env()).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/srv/agenda"));
        assert_eq!(config.max_occurrences, 52);
        assert_eq!(config.user(), User::new("marie", Role::Editor));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_occurrences = 52\nlog_level = \"info\"\n").unwrap();

        let mut env = Map::new();
        env.insert("AGENDA_MAX_OCCURRENCES".to_string(), "10".to_string());
        env.insert("AGENDA_ROLE".to_string(), "viewer".to_string());

        let config = AgendaConfig::load_from(&path, Some(env)).unwrap();
        assert_eq!(config.max_occurrences, 10);
        assert_eq!(config.role, Role::Viewer);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_role_name_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "role = \"Editor\"\n").unwrap();

        let config = AgendaConfig::load_from(&path, no_env()).unwrap();
        assert_eq!(config.role, Role::Editor);

        std::fs::write(&path, "role = \"owner\"\n").unwrap();
        assert!(AgendaConfig::load_from(&path, no_env()).is_err());
    }

    #[test]
    fn test_zero_max_occurrences_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_occurrences = 0\n").unwrap();

        assert!(matches!(
            AgendaConfig::load_from(&path, no_env()),
            Err(AgendaError::Config(_))
        ));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = AgendaConfig::default();
        let parsed: AgendaConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
