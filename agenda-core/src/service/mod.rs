//! Activity, category and location management on top of a [`Repository`].
//!
//! Every mutation checks the acting user's role and validates its payload
//! before anything reaches the store.

mod activities;
mod catalog;

pub use activities::DeleteScope;
pub use catalog::SeedReport;

use crate::config::{AgendaConfig, DEFAULT_MAX_OCCURRENCES};
use crate::store::Repository;

pub struct Agenda<R: Repository> {
    repo: R,
    max_occurrences: usize,
}

impl<R: Repository> Agenda<R> {
    pub fn new(repo: R) -> Self {
        Agenda {
            repo,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }

    pub fn from_config(repo: R, config: &AgendaConfig) -> Self {
        Self::new(repo).with_max_occurrences(config.max_occurrences)
    }

    pub fn with_max_occurrences(mut self, max_occurrences: usize) -> Self {
        self.max_occurrences = max_occurrences;
        self
    }
}
