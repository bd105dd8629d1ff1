//! Who is acting, and what they may manage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    /// Manages activities, the catalog and users
    Admin,
    /// Manages activities and the catalog
    Editor,
    /// Read-only
    Viewer,
}

impl FromStr for Role {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(AgendaError::validation(
                "role",
                format!("unknown role '{other}', expected admin, editor or viewer"),
            )),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = AgendaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        User {
            username: username.into(),
            role,
        }
    }

    pub fn can_manage_activities(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Editor)
    }

    pub fn can_manage_users(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with `Unauthorized` unless the user may manage activities.
    pub fn require_manager(&self) -> AgendaResult<()> {
        if self.can_manage_activities() {
            Ok(())
        } else {
            Err(AgendaError::Unauthorized(format!(
                "{} ({}) cannot manage activities",
                self.username, self.role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        let admin = User::new("admin", Role::Admin);
        let editor = User::new("marie", Role::Editor);
        let viewer = User::new("guest", Role::Viewer);

        assert!(admin.can_manage_activities() && admin.can_manage_users());
        assert!(editor.can_manage_activities() && !editor.can_manage_users());
        assert!(!viewer.can_manage_activities() && !viewer.can_manage_users());

        assert!(editor.require_manager().is_ok());
        assert!(matches!(
            viewer.require_manager(),
            Err(AgendaError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Editor".parse::<Role>().unwrap(), Role::Editor);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_accepts_any_case() {
        let role: Role = serde_json::from_str("\"Viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
        assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"editor\"");
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
    }
}
