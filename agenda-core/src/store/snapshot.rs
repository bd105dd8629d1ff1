//! The whole data set as one serializable value.
//!
//! Both stores apply changes to a snapshot under a write lock, which keeps
//! every multi-record change (a recurring series, a series swap) atomic.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, NewActivity};
use crate::catalog::{Category, Location};
use crate::error::{AgendaError, AgendaResult};
use crate::ids::{ActivityId, CategoryId, LocationId, SeriesId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    activities: Vec<Activity>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    locations: Vec<Location>,
}

impl Snapshot {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ACTIVITIES:

    pub fn activity(&self, id: ActivityId) -> AgendaResult<Activity> {
        self.activities
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AgendaError::not_found("Activity", id))
    }

    /// All activities ordered by date, then id.
    pub fn activities(&self) -> Vec<Activity> {
        let mut activities = self.activities.clone();
        activities.sort_by_key(|a| (a.occurrence.date, a.id));
        activities
    }

    pub fn series_activities(&self, series: SeriesId) -> Vec<Activity> {
        self.activities()
            .into_iter()
            .filter(|a| a.series.is_some_and(|s| s.id == series))
            .collect()
    }

    /// Remove `remove` and insert `insert` as a single change.
    ///
    /// Fails without touching anything if an id to remove does not exist.
    pub fn replace_activities(
        &mut self,
        remove: &[ActivityId],
        insert: Vec<NewActivity>,
    ) -> AgendaResult<Vec<ActivityId>> {
        if let Some(missing) = remove
            .iter()
            .find(|id| !self.activities.iter().any(|a| a.id == **id))
        {
            return Err(AgendaError::not_found("Activity", missing));
        }

        self.activities.retain(|a| !remove.contains(&a.id));

        let now = Utc::now();
        let mut ids = Vec::with_capacity(insert.len());
        for new in insert {
            let id = ActivityId(self.next_id());
            self.activities.push(Activity {
                id,
                occurrence: new.occurrence,
                series: new.series,
                created_at: now,
                updated_at: now,
            });
            ids.push(id);
        }

        Ok(ids)
    }

    /// Overwrite one activity in place, keeping its id and creation time.
    pub fn update_activity(&mut self, id: ActivityId, update: NewActivity) -> AgendaResult<Activity> {
        let activity = self
            .activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AgendaError::not_found("Activity", id))?;

        activity.occurrence = update.occurrence;
        activity.series = update.series;
        activity.updated_at = Utc::now();

        Ok(activity.clone())
    }

    // CATEGORIES:

    pub fn category(&self, id: CategoryId) -> AgendaResult<Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AgendaError::not_found("Category", id))
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    pub fn insert_category(&mut self, name: &str) -> AgendaResult<Category> {
        if self.categories.iter().any(|c| c.name == name) {
            return Err(AgendaError::Conflict(format!(
                "category '{name}' already exists"
            )));
        }
        let category = Category {
            id: CategoryId(self.next_id()),
            name: name.to_string(),
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn rename_category(&mut self, id: CategoryId, name: &str) -> AgendaResult<Category> {
        if self.categories.iter().any(|c| c.name == name && c.id != id) {
            return Err(AgendaError::Conflict(format!(
                "category name '{name}' already exists"
            )));
        }
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AgendaError::not_found("Category", id))?;
        category.name = name.to_string();
        Ok(category.clone())
    }

    pub fn delete_category(&mut self, id: CategoryId) -> AgendaResult<()> {
        let category = self.category(id)?;
        if self
            .activities
            .iter()
            .any(|a| a.occurrence.category_ids.contains(&id))
        {
            return Err(AgendaError::InUse(format!("category '{}'", category.name)));
        }
        self.categories.retain(|c| c.id != id);
        Ok(())
    }

    // LOCATIONS:

    pub fn location(&self, id: LocationId) -> AgendaResult<Location> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| AgendaError::not_found("Location", id))
    }

    pub fn locations(&self) -> Vec<Location> {
        let mut locations = self.locations.clone();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        locations
    }

    pub fn insert_location(&mut self, name: &str) -> AgendaResult<Location> {
        if self.locations.iter().any(|l| l.name == name) {
            return Err(AgendaError::Conflict(format!(
                "location '{name}' already exists"
            )));
        }
        let location = Location {
            id: LocationId(self.next_id()),
            name: name.to_string(),
        };
        self.locations.push(location.clone());
        Ok(location)
    }

    pub fn rename_location(&mut self, id: LocationId, name: &str) -> AgendaResult<Location> {
        if self.locations.iter().any(|l| l.name == name && l.id != id) {
            return Err(AgendaError::Conflict(format!(
                "location name '{name}' already exists"
            )));
        }
        let location = self
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AgendaError::not_found("Location", id))?;
        location.name = name.to_string();
        Ok(location.clone())
    }

    pub fn delete_location(&mut self, id: LocationId) -> AgendaResult<()> {
        let location = self.location(id)?;
        if self
            .activities
            .iter()
            .any(|a| a.occurrence.location_id == Some(id))
        {
            return Err(AgendaError::InUse(format!("location '{}'", location.name)));
        }
        self.locations.retain(|l| l.id != id);
        Ok(())
    }

    /// Insert whichever of the given names are missing; returns what was added.
    pub fn seed_catalog(
        &mut self,
        categories: &[&str],
        locations: &[&str],
    ) -> AgendaResult<(Vec<Category>, Vec<Location>)> {
        let mut added_categories = Vec::new();
        for name in categories {
            if !self.categories.iter().any(|c| c.name == *name) {
                added_categories.push(self.insert_category(name)?);
            }
        }

        let mut added_locations = Vec::new();
        for name in locations {
            if !self.locations.iter().any(|l| l.name == *name) {
                added_locations.push(self.insert_location(name)?);
            }
        }

        Ok((added_categories, added_locations))
    }
}
