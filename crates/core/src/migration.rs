use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single migration file: its name is its identity, its content is executed
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: String,
    pub content: String,
}

impl Migration {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), content: content.into() }
    }
}

/// A row of the tracking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedRecord {
    pub name: String,
    pub batch: i32,
    pub applied_at: DateTime<Utc>,
}

/// Returns the migrations whose name is not in `applied`, keeping the input
/// order.
pub fn select_pending<'a>(
    migrations: &'a [Migration],
    applied: &HashSet<String>,
) -> Vec<&'a Migration> {
    migrations.iter().filter(|m| !applied.contains(&m.name)).collect()
}

/// Everything discovered before anything is applied.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
    pub migrations: Vec<Migration>,
    pub applied: HashSet<String>,
}

impl MigrationPlan {
    pub fn new(migrations: Vec<Migration>, applied: HashSet<String>) -> Self {
        Self { migrations, applied }
    }

    /// The selection: migrations on disk that have no tracking record.
    pub fn pending(&self) -> Vec<&Migration> {
        select_pending(&self.migrations, &self.applied)
    }

    /// Migrations on disk that already have a tracking record.
    pub fn applied_count(&self) -> usize {
        self.migrations.iter().filter(|m| self.applied.contains(&m.name)).count()
    }

    /// Recorded names with no file on disk any more.
    pub fn orphaned(&self) -> Vec<&str> {
        let on_disk: HashSet<&str> = self.migrations.iter().map(|m| m.name.as_str()).collect();
        let mut orphans: Vec<&str> =
            self.applied.iter().map(String::as_str).filter(|n| !on_disk.contains(n)).collect();
        orphans.sort_unstable();
        orphans
    }

    /// No file on disk is waiting to be applied.
    pub fn is_up_to_date(&self) -> bool {
        self.migrations.iter().all(|m| self.applied.contains(&m.name))
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub discovered: usize,
    pub already_applied: usize,
    pub applied: Vec<String>,
    pub batch: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(selected: &[&Migration]) -> Vec<String> {
        selected.iter().map(|m| m.name.clone()).collect()
    }

    fn applied(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_select_preserves_relative_order() {
        let migrations = vec![
            Migration::new("001_a", "SELECT 1"),
            Migration::new("002_b", "SELECT 2"),
            Migration::new("003_c", "SELECT 3"),
        ];
        let selected = select_pending(&migrations, &applied(&["002_b"]));
        assert_eq!(names(&selected), vec!["001_a", "003_c"]);
    }

    #[test]
    fn test_select_empty_when_all_applied() {
        let migrations = vec![Migration::new("001_a", ""), Migration::new("002_b", "")];
        let selected = select_pending(&migrations, &applied(&["001_a", "002_b", "999_gone"]));
        assert!(selected.is_empty());
    }

    #[test]
    fn test_select_everything_on_fresh_database() {
        let migrations = vec![Migration::new("b", ""), Migration::new("a", "")];
        let selected = select_pending(&migrations, &HashSet::new());
        assert_eq!(names(&selected), vec!["b", "a"]);
    }

    #[test]
    fn test_select_matches_exact_names_only() {
        let migrations = vec![Migration::new("001_a.sql", "")];
        let selected = select_pending(&migrations, &applied(&["001_a"]));
        assert_eq!(names(&selected), vec!["001_a.sql"]);
    }

    #[test]
    fn test_plan_counts_and_orphans() {
        let plan = MigrationPlan::new(
            vec![Migration::new("001", ""), Migration::new("002", "")],
            applied(&["001", "000_removed"]),
        );
        assert_eq!(plan.applied_count(), 1);
        assert_eq!(names(&plan.pending()), vec!["002"]);
        assert_eq!(plan.orphaned(), vec!["000_removed"]);
        assert!(!plan.is_up_to_date());
    }

    #[test]
    fn test_plan_up_to_date() {
        let plan = MigrationPlan::new(vec![Migration::new("001", "")], applied(&["001"]));
        assert!(plan.is_up_to_date());
        assert!(plan.pending().is_empty());
    }
}
