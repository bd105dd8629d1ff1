//! Creating, updating and deleting activities.

use chrono::NaiveDate;

use crate::activity::{Activity, ActivityTemplate, NewActivity, Series, expand_template};
use crate::error::{AgendaError, AgendaResult};
use crate::ids::{ActivityId, SeriesId};
use crate::payload::{ActivityPayload, ValidatedActivity};
use crate::service::Agenda;
use crate::store::Repository;
use crate::user::User;

/// How much of a recurring activity a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    /// Only the given occurrence
    Single,
    /// Every occurrence of its series (same as Single for one-off activities)
    Series,
}

impl<R: Repository> Agenda<R> {
    pub fn activities(&self) -> AgendaResult<Vec<Activity>> {
        self.repo.activities()
    }

    pub fn activity(&self, id: ActivityId) -> AgendaResult<Activity> {
        self.repo.activity(id)
    }

    /// Activities covering any day in `[from, to]`.
    pub fn activities_between(&self, from: NaiveDate, to: NaiveDate) -> AgendaResult<Vec<Activity>> {
        Ok(self
            .repo
            .activities()?
            .into_iter()
            .filter(|a| a.overlaps(from, to))
            .collect())
    }

    /// Create an activity, or its whole series when the payload recurs.
    ///
    /// The series is stored in one repository call, so either every
    /// occurrence is created or none is.
    pub fn create_activity(
        &self,
        user: &User,
        payload: &ActivityPayload,
    ) -> AgendaResult<Vec<ActivityId>> {
        user.require_manager()?;
        let validated = payload.validate()?;
        self.check_references(&validated.template)?;

        let planned = self.plan(&validated)?;
        let ids = self.repo.insert_activities(planned)?;

        tracing::info!(
            user = %user.username,
            title = %validated.template.title,
            count = ids.len(),
            "created activity"
        );
        Ok(ids)
    }

    /// Replace an activity with the payload.
    ///
    /// An activity that belongs to a series has the whole series regenerated
    /// from the payload, swapped in atomically. Returns the ids now holding
    /// the activity.
    pub fn update_activity(
        &self,
        user: &User,
        id: ActivityId,
        payload: &ActivityPayload,
    ) -> AgendaResult<Vec<ActivityId>> {
        user.require_manager()?;
        let validated = payload.validate()?;
        self.check_references(&validated.template)?;

        let existing = self.repo.activity(id)?;
        let mut planned = self.plan(&validated)?;

        let ids = match existing.series {
            Some(series) => {
                let members = self.series_ids(series.id)?;
                self.repo.replace_activities(&members, planned)?
            }
            None if planned.len() == 1 => {
                let update = planned.remove(0);
                vec![self.repo.update_activity(id, update)?.id]
            }
            None => self.repo.replace_activities(&[id], planned)?,
        };

        tracing::info!(
            user = %user.username,
            %id,
            count = ids.len(),
            "updated activity"
        );
        Ok(ids)
    }

    /// Delete an activity; returns how many records were removed.
    pub fn delete_activity(
        &self,
        user: &User,
        id: ActivityId,
        scope: DeleteScope,
    ) -> AgendaResult<usize> {
        user.require_manager()?;
        let existing = self.repo.activity(id)?;

        let ids = match (scope, existing.series) {
            (DeleteScope::Series, Some(series)) => self.series_ids(series.id)?,
            _ => vec![id],
        };
        self.repo.delete_activities(&ids)?;

        tracing::info!(user = %user.username, %id, count = ids.len(), "deleted activity");
        Ok(ids.len())
    }

    fn series_ids(&self, series: SeriesId) -> AgendaResult<Vec<ActivityId>> {
        Ok(self
            .repo
            .series_activities(series)?
            .into_iter()
            .map(|a| a.id)
            .collect())
    }

    /// Referenced categories and location must exist.
    fn check_references(&self, template: &ActivityTemplate) -> AgendaResult<()> {
        for category_id in &template.category_ids {
            self.repo.category(*category_id)?;
        }
        if let Some(location_id) = template.location_id {
            self.repo.location(location_id)?;
        }
        Ok(())
    }

    /// Materialize the records a validated payload stands for.
    fn plan(&self, validated: &ValidatedActivity) -> AgendaResult<Vec<NewActivity>> {
        let template = &validated.template;

        let Some(rule) = validated.recurrence else {
            let occurrences = expand_template(template, &[template.start_date])?;
            return Ok(occurrences
                .into_iter()
                .map(|occurrence| NewActivity {
                    occurrence,
                    series: None,
                })
                .collect());
        };

        // Stop one past the limit so an oversized rule is never materialized.
        let dates: Vec<_> = rule.iter().take(self.max_occurrences + 1).collect();
        if dates.len() > self.max_occurrences {
            return Err(AgendaError::validation(
                "recurrence_end_date",
                format!(
                    "more than {} {} occurrences until {}",
                    self.max_occurrences, rule.frequency, rule.end_date
                ),
            ));
        }

        let series = Series {
            id: SeriesId::new(),
            frequency: rule.frequency,
            until: rule.end_date,
        };

        tracing::debug!(series_id = %series.id, count = dates.len(), "expanding recurring activity");

        Ok(expand_template(template, &dates)?
            .into_iter()
            .map(|occurrence| NewActivity {
                occurrence,
                series: Some(series),
            })
            .collect())
    }
}
