//! Persistence interface for activities, categories and locations.
//!
//! The service layer only talks to [`Repository`]; which store backs it is
//! decided by the caller.

mod file;
mod memory;
mod snapshot;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::Snapshot;

use crate::activity::{Activity, NewActivity};
use crate::catalog::{Category, Location};
use crate::error::AgendaResult;
use crate::ids::{ActivityId, CategoryId, LocationId, SeriesId};

/// Storage for the agenda data set.
///
/// Every method that takes several records applies them all or none.
pub trait Repository: Send + Sync {
    fn activity(&self, id: ActivityId) -> AgendaResult<Activity>;
    fn activities(&self) -> AgendaResult<Vec<Activity>>;
    fn series_activities(&self, series: SeriesId) -> AgendaResult<Vec<Activity>>;
    fn replace_activities(
        &self,
        remove: &[ActivityId],
        insert: Vec<NewActivity>,
    ) -> AgendaResult<Vec<ActivityId>>;
    fn update_activity(&self, id: ActivityId, update: NewActivity) -> AgendaResult<Activity>;

    fn insert_activities(&self, activities: Vec<NewActivity>) -> AgendaResult<Vec<ActivityId>> {
        self.replace_activities(&[], activities)
    }

    fn delete_activities(&self, ids: &[ActivityId]) -> AgendaResult<()> {
        self.replace_activities(ids, Vec::new()).map(|_| ())
    }

    fn category(&self, id: CategoryId) -> AgendaResult<Category>;
    fn categories(&self) -> AgendaResult<Vec<Category>>;
    fn insert_category(&self, name: &str) -> AgendaResult<Category>;
    fn rename_category(&self, id: CategoryId, name: &str) -> AgendaResult<Category>;
    fn delete_category(&self, id: CategoryId) -> AgendaResult<()>;

    fn location(&self, id: LocationId) -> AgendaResult<Location>;
    fn locations(&self) -> AgendaResult<Vec<Location>>;
    fn insert_location(&self, name: &str) -> AgendaResult<Location>;
    fn rename_location(&self, id: LocationId, name: &str) -> AgendaResult<Location>;
    fn delete_location(&self, id: LocationId) -> AgendaResult<()>;

    /// Add the missing names among `categories` and `locations` in one write.
    fn seed_catalog(
        &self,
        categories: &[&str],
        locations: &[&str],
    ) -> AgendaResult<(Vec<Category>, Vec<Location>)>;
}

/// A store that keeps its data as a [`Snapshot`].
///
/// `write` must either commit the closure's changes entirely or leave the
/// store as it was.
pub trait SnapshotStore: Send + Sync {
    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> AgendaResult<T>;
    fn write<T>(&self, f: impl FnOnce(&mut Snapshot) -> AgendaResult<T>) -> AgendaResult<T>;
}

impl<S: SnapshotStore> Repository for S {
    fn activity(&self, id: ActivityId) -> AgendaResult<Activity> {
        self.read(|s| s.activity(id))?
    }

    fn activities(&self) -> AgendaResult<Vec<Activity>> {
        self.read(|s| s.activities())
    }

    fn series_activities(&self, series: SeriesId) -> AgendaResult<Vec<Activity>> {
        self.read(|s| s.series_activities(series))
    }

    fn replace_activities(
        &self,
        remove: &[ActivityId],
        insert: Vec<NewActivity>,
    ) -> AgendaResult<Vec<ActivityId>> {
        self.write(|s| s.replace_activities(remove, insert))
    }

    fn update_activity(&self, id: ActivityId, update: NewActivity) -> AgendaResult<Activity> {
        self.write(|s| s.update_activity(id, update))
    }

    fn category(&self, id: CategoryId) -> AgendaResult<Category> {
        self.read(|s| s.category(id))?
    }

    fn categories(&self) -> AgendaResult<Vec<Category>> {
        self.read(|s| s.categories())
    }

    fn insert_category(&self, name: &str) -> AgendaResult<Category> {
        self.write(|s| s.insert_category(name))
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> AgendaResult<Category> {
        self.write(|s| s.rename_category(id, name))
    }

    fn delete_category(&self, id: CategoryId) -> AgendaResult<()> {
        self.write(|s| s.delete_category(id))
    }

    fn location(&self, id: LocationId) -> AgendaResult<Location> {
        self.read(|s| s.location(id))?
    }

    fn locations(&self) -> AgendaResult<Vec<Location>> {
        self.read(|s| s.locations())
    }

    fn insert_location(&self, name: &str) -> AgendaResult<Location> {
        self.write(|s| s.insert_location(name))
    }

    fn rename_location(&self, id: LocationId, name: &str) -> AgendaResult<Location> {
        self.write(|s| s.rename_location(id, name))
    }

    fn delete_location(&self, id: LocationId) -> AgendaResult<()> {
        self.write(|s| s.delete_location(id))
    }

    fn seed_catalog(
        &self,
        categories: &[&str],
        locations: &[&str],
    ) -> AgendaResult<(Vec<Category>, Vec<Location>)> {
        self.write(|s| s.seed_catalog(categories, locations))
    }
}
