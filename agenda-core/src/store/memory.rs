//! In-process store.

use std::sync::RwLock;

use crate::error::{AgendaError, AgendaResult};
use crate::store::{Snapshot, SnapshotStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> AgendaResult<T> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| AgendaError::Storage("memory store lock poisoned".into()))?;
        Ok(f(&snapshot))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Snapshot) -> AgendaResult<T>) -> AgendaResult<T> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| AgendaError::Storage("memory store lock poisoned".into()))?;

        // Work on a copy so a failed change leaves nothing behind.
        let mut draft = snapshot.clone();
        let result = f(&mut draft)?;
        *snapshot = draft;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityTemplate, NewActivity, Series, expand_template};
    use crate::ids::{ActivityId, CategoryId, LocationId, SeriesId};
    use crate::recurrence::{Frequency, generate_dates};
    use crate::store::Repository;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn weekly_series(template: &ActivityTemplate, until: NaiveDate) -> Vec<NewActivity> {
        let series = Series {
            id: SeriesId::new(),
            frequency: Frequency::Weekly,
            until,
        };
        let dates = generate_dates(template.start_date, Frequency::Weekly, until);
        expand_template(template, &dates)
            .unwrap()
            .into_iter()
            .map(|occurrence| NewActivity {
                occurrence,
                series: Some(series),
            })
            .collect()
    }

    #[test]
    fn test_insert_series_assigns_ids_in_order() {
        let store = MemoryStore::new();
        let template = ActivityTemplate::new("Choir", d(2025, 3, 3));

        let ids = store
            .insert_activities(weekly_series(&template, d(2025, 3, 24)))
            .unwrap();

        assert_eq!(ids.len(), 4);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let stored = store.activities().unwrap();
        let dates: Vec<_> = stored.iter().map(|a| a.occurrence.date).collect();
        assert_eq!(
            dates,
            vec![d(2025, 3, 3), d(2025, 3, 10), d(2025, 3, 17), d(2025, 3, 24)]
        );

        let series = stored[0].series.unwrap().id;
        assert_eq!(store.series_activities(series).unwrap().len(), 4);
    }

    #[test]
    fn test_replace_with_unknown_id_changes_nothing() {
        let store = MemoryStore::new();
        let template = ActivityTemplate::new("Choir", d(2025, 3, 3));
        let ids = store
            .insert_activities(weekly_series(&template, d(2025, 3, 17)))
            .unwrap();

        let err = store
            .replace_activities(
                &[ids[0], ActivityId(999)],
                weekly_series(&template, d(2025, 5, 1)),
            )
            .unwrap_err();

        assert!(matches!(err, AgendaError::NotFound { .. }));
        assert_eq!(store.activities().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_activities() {
        let store = MemoryStore::new();
        let template = ActivityTemplate::new("Choir", d(2025, 3, 3));
        let ids = store
            .insert_activities(weekly_series(&template, d(2025, 3, 17)))
            .unwrap();

        store.delete_activities(&ids[..2]).unwrap();

        let remaining = store.activities().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, ids[2]);
        assert!(matches!(
            store.activity(ids[0]),
            Err(AgendaError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let store = MemoryStore::new();
        let template = ActivityTemplate::new("Choir", d(2025, 3, 3));
        let id = store
            .insert_activities(weekly_series(&template, d(2025, 3, 3)))
            .unwrap()[0];
        let before = store.activity(id).unwrap();

        let mut moved = before.occurrence.clone();
        moved.date = d(2025, 3, 4);
        let after = store
            .update_activity(
                id,
                NewActivity {
                    occurrence: moved,
                    series: None,
                },
            )
            .unwrap();

        assert_eq!(after.id, id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.occurrence.date, d(2025, 3, 4));
        assert!(!after.is_recurring());
    }

    #[test]
    fn test_category_names_are_unique() {
        let store = MemoryStore::new();
        let yoga = store.insert_category("Yoga").unwrap();
        let dance = store.insert_category("Dance").unwrap();

        assert!(matches!(
            store.insert_category("Yoga"),
            Err(AgendaError::Conflict(_))
        ));
        assert!(matches!(
            store.rename_category(dance.id, "Yoga"),
            Err(AgendaError::Conflict(_))
        ));

        // Renaming to its own name is fine.
        store.rename_category(yoga.id, "Yoga").unwrap();

        let names: Vec<_> = store.categories().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Dance", "Yoga"]);
    }

    #[test]
    fn test_referenced_category_and_location_cannot_be_deleted() {
        let store = MemoryStore::new();
        let category = store.insert_category("Ateliers").unwrap();
        let location = store.insert_location("Cuisine").unwrap();
        let spare = store.insert_location("Extérieur").unwrap();

        let mut template = ActivityTemplate::new("Bread baking", d(2025, 3, 3));
        template.category_ids = vec![category.id];
        template.location_id = Some(location.id);
        store
            .insert_activities(weekly_series(&template, d(2025, 3, 3)))
            .unwrap();

        assert!(matches!(
            store.delete_category(category.id),
            Err(AgendaError::InUse(_))
        ));
        assert!(matches!(
            store.delete_location(location.id),
            Err(AgendaError::InUse(_))
        ));

        store.delete_location(spare.id).unwrap();
        assert_eq!(store.locations().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_catalog_entries() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.category(CategoryId(3)),
            Err(AgendaError::NotFound { kind: "Category", .. })
        ));
        assert!(matches!(
            store.rename_location(LocationId(3), "Attic"),
            Err(AgendaError::NotFound { kind: "Location", .. })
        ));
    }
}
