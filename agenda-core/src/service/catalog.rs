//! Category and location management.

use crate::catalog::{Category, DEFAULT_CATEGORIES, DEFAULT_LOCATIONS, Location};
use crate::error::AgendaResult;
use crate::ids::{CategoryId, LocationId};
use crate::payload::NamePayload;
use crate::service::Agenda;
use crate::store::Repository;
use crate::user::User;

/// What [`Agenda::seed_defaults`] added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.locations.is_empty()
    }
}

impl<R: Repository> Agenda<R> {
    // CATEGORIES:

    pub fn categories(&self) -> AgendaResult<Vec<Category>> {
        self.repo.categories()
    }

    pub fn category(&self, id: CategoryId) -> AgendaResult<Category> {
        self.repo.category(id)
    }

    pub fn create_category(&self, user: &User, payload: &NamePayload) -> AgendaResult<Category> {
        user.require_manager()?;
        let category = self.repo.insert_category(&payload.validate()?)?;
        tracing::info!(user = %user.username, id = %category.id, name = %category.name, "created category");
        Ok(category)
    }

    pub fn rename_category(
        &self,
        user: &User,
        id: CategoryId,
        payload: &NamePayload,
    ) -> AgendaResult<Category> {
        user.require_manager()?;
        let category = self.repo.rename_category(id, &payload.validate()?)?;
        tracing::info!(user = %user.username, %id, name = %category.name, "renamed category");
        Ok(category)
    }

    /// Refused while any activity still uses the category.
    pub fn delete_category(&self, user: &User, id: CategoryId) -> AgendaResult<()> {
        user.require_manager()?;
        self.repo.delete_category(id)?;
        tracing::info!(user = %user.username, %id, "deleted category");
        Ok(())
    }

    // LOCATIONS:

    pub fn locations(&self) -> AgendaResult<Vec<Location>> {
        self.repo.locations()
    }

    pub fn location(&self, id: LocationId) -> AgendaResult<Location> {
        self.repo.location(id)
    }

    pub fn create_location(&self, user: &User, payload: &NamePayload) -> AgendaResult<Location> {
        user.require_manager()?;
        let location = self.repo.insert_location(&payload.validate()?)?;
        tracing::info!(user = %user.username, id = %location.id, name = %location.name, "created location");
        Ok(location)
    }

    pub fn rename_location(
        &self,
        user: &User,
        id: LocationId,
        payload: &NamePayload,
    ) -> AgendaResult<Location> {
        user.require_manager()?;
        let location = self.repo.rename_location(id, &payload.validate()?)?;
        tracing::info!(user = %user.username, %id, name = %location.name, "renamed location");
        Ok(location)
    }

    /// Refused while any activity still takes place there.
    pub fn delete_location(&self, user: &User, id: LocationId) -> AgendaResult<()> {
        user.require_manager()?;
        self.repo.delete_location(id)?;
        tracing::info!(user = %user.username, %id, "deleted location");
        Ok(())
    }

    /// Create the default categories and locations that don't exist yet.
    ///
    /// Everything is added in a single repository write.
    pub fn seed_defaults(&self, user: &User) -> AgendaResult<SeedReport> {
        user.require_manager()?;
        let (categories, locations) = self
            .repo
            .seed_catalog(&DEFAULT_CATEGORIES, &DEFAULT_LOCATIONS)?;
        let report = SeedReport {
            categories,
            locations,
        };

        tracing::info!(
            categories = report.categories.len(),
            locations = report.locations.len(),
            "seeded defaults"
        );
        Ok(report)
    }
}
