//! Categories and locations that activities refer to.

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, LocationId};

pub const DEFAULT_CATEGORIES: [&str; 4] = [
    "Cours de langue",
    "Activités sociales",
    "Activités physiques",
    "Ateliers",
];

pub const DEFAULT_LOCATIONS: [&str; 4] = [
    "Salle principale",
    "Salle de réunion",
    "Extérieur",
    "Cuisine",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}
