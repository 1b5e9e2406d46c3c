//! Structural validation of schedule snapshots.
//!
//! Checks the invariants every downstream stage relies on. Detects:
//! - Duplicate IDs
//! - Missing or multiple roots, and a root that is not a group
//! - Parent references that don't resolve, and cycles in the parent relation
//! - Dependencies that don't resolve, and self-dependencies
//! - Date ranges with `end < start` and progress above 100
//! - Circular precedence dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashSet;

use crate::error::ScheduleError;
use crate::graph::ActivityGraph;
use crate::models::ScheduleSnapshot;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Activity the error was found on.
    pub activity_id: String,
    /// The offending reference (missing parent or dependency id), if any.
    pub reference: Option<String>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two activities share the same ID.
    DuplicateId,
    /// No activity is parentless.
    MissingRoot,
    /// More than one activity is parentless.
    MultipleRoots,
    /// The root node is not a group.
    RootNotGroup,
    /// A parent reference does not resolve.
    InvalidParent,
    /// The parent relation contains a cycle.
    ParentCycle,
    /// A dependency references an activity that doesn't exist.
    DanglingDependency,
    /// An activity depends on itself.
    SelfDependency,
    /// `end` precedes `start`.
    InvalidDateRange,
    /// Progress outside 0..=100.
    InvalidProgress,
    /// Precedence graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(
        kind: ValidationErrorKind,
        activity_id: impl Into<String>,
        reference: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            activity_id: activity_id.into(),
            reference,
            message: message.into(),
        }
    }
}

/// Validates a snapshot.
///
/// An empty snapshot is valid. Otherwise checks:
/// 1. No duplicate activity IDs
/// 2. Exactly one parentless node, and it is a group
/// 3. Every parent reference resolves and the parent relation is acyclic
/// 4. Every dependency resolves and none is a self-reference
/// 5. `end >= start` and `progress <= 100` on every activity
/// 6. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(snapshot: &ScheduleSnapshot) -> ValidationResult {
    if snapshot.is_empty() {
        return Ok(());
    }

    let mut errors = Vec::new();
    let activities = &snapshot.activities;

    let mut ids = HashSet::new();
    for act in activities {
        if !ids.insert(act.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &act.id,
                None,
                format!("Duplicate activity ID: {}", act.id),
            ));
        }
    }

    let roots: Vec<&str> = activities
        .iter()
        .filter(|a| a.parent_id.is_none())
        .map(|a| a.id.as_str())
        .collect();
    match roots.as_slice() {
        [] => errors.push(ValidationError::new(
            ValidationErrorKind::MissingRoot,
            "",
            None,
            "Schedule has no root group",
        )),
        [root] => {
            if snapshot.get(root).is_some_and(|r| !r.is_group()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::RootNotGroup,
                    *root,
                    None,
                    format!("Root activity '{root}' is not a group"),
                ));
            }
        }
        [_, extra @ ..] => {
            for id in extra {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MultipleRoots,
                    *id,
                    None,
                    format!("Activity '{id}' has no parent but is not the root"),
                ));
            }
        }
    }

    for act in activities {
        if let Some(parent) = act.parent_id.as_deref() {
            if parent == act.id || !ids.contains(parent) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParent,
                    &act.id,
                    Some(parent.to_string()),
                    format!("Activity '{}' references invalid parent '{}'", act.id, parent),
                ));
            }
        }

        for dep in &act.dependencies {
            if *dep == act.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    &act.id,
                    Some(dep.clone()),
                    format!("Activity '{}' depends on itself", act.id),
                ));
            } else if !ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DanglingDependency,
                    &act.id,
                    Some(dep.clone()),
                    format!("Activity '{}' depends on unknown activity '{}'", act.id, dep),
                ));
            }
        }

        if act.end < act.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDateRange,
                &act.id,
                None,
                format!("Activity '{}' ends ({}) before it starts ({})", act.id, act.end, act.start),
            ));
        }

        if act.progress > 100 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidProgress,
                &act.id,
                None,
                format!("Activity '{}' has progress {} above 100", act.id, act.progress),
            ));
        }
    }

    let graph = ActivityGraph::build(activities);

    if let Some(cycle) = graph.parent_cycle() {
        errors.push(ValidationError::new(
            ValidationErrorKind::ParentCycle,
            cycle.first().cloned().unwrap_or_default(),
            None,
            format!("Parent cycle detected: {}", cycle.join(" -> ")),
        ));
    }

    // Self-dependencies are already reported above.
    let has_self_dependency = activities
        .iter()
        .any(|a| a.dependencies.iter().any(|d| *d == a.id));
    if !has_self_dependency {
        if let Err(ScheduleError::CycleDetected { ids: cycle }) = graph.topological_order() {
            errors.push(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                cycle.first().cloned().unwrap_or_default(),
                None,
                format!("Circular dependency detected: {}", cycle.join(" -> ")),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn sample() -> Vec<Activity> {
        vec![
            Activity::group("R", d(1), d(10)),
            Activity::group("1", d(1), d(10)).with_parent("R"),
            Activity::task("1.1", d(1), d(4)).with_parent("1"),
            Activity::task("1.2", d(4), d(10)).with_parent("1").with_dependency("1.1"),
        ]
    }

    fn kinds(acts: Vec<Activity>) -> Vec<ValidationErrorKind> {
        validate_snapshot(&ScheduleSnapshot::new(acts))
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_snapshot() {
        assert!(validate_snapshot(&ScheduleSnapshot::new(sample())).is_ok());
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        assert!(validate_snapshot(&ScheduleSnapshot::empty()).is_ok());
    }

    #[test]
    fn test_duplicate_id() {
        let mut acts = sample();
        acts.push(Activity::task("1.1", d(1), d(2)).with_parent("1"));
        assert!(kinds(acts).contains(&ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_multiple_roots() {
        let mut acts = sample();
        acts.push(Activity::task("stray", d(1), d(2)));
        assert!(kinds(acts).contains(&ValidationErrorKind::MultipleRoots));
    }

    #[test]
    fn test_missing_root() {
        let acts = vec![
            Activity::group("A", d(1), d(2)).with_parent("B"),
            Activity::group("B", d(1), d(2)).with_parent("A"),
        ];
        let found = kinds(acts);
        assert!(found.contains(&ValidationErrorKind::MissingRoot));
        assert!(found.contains(&ValidationErrorKind::ParentCycle));
    }

    #[test]
    fn test_root_not_group() {
        let acts = vec![Activity::task("only", d(1), d(2))];
        assert_eq!(kinds(acts), vec![ValidationErrorKind::RootNotGroup]);
    }

    #[test]
    fn test_invalid_parent() {
        let mut acts = sample();
        acts.push(Activity::task("x", d(1), d(2)).with_parent("nowhere"));
        let errors = validate_snapshot(&ScheduleSnapshot::new(acts)).unwrap_err();
        let err = errors
            .iter()
            .find(|e| e.kind == ValidationErrorKind::InvalidParent)
            .unwrap();
        assert_eq!(err.activity_id, "x");
        assert_eq!(err.reference.as_deref(), Some("nowhere"));
    }

    #[test]
    fn test_dangling_dependency_names_both_ids() {
        let mut acts = sample();
        acts[2] = acts[2].clone().with_dependency("9.9");
        let errors = validate_snapshot(&ScheduleSnapshot::new(acts)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DanglingDependency);
        assert_eq!(errors[0].activity_id, "1.1");
        assert_eq!(errors[0].reference.as_deref(), Some("9.9"));
    }

    #[test]
    fn test_self_dependency() {
        let mut acts = sample();
        acts[2] = acts[2].clone().with_dependency("1.1");
        assert_eq!(kinds(acts), vec![ValidationErrorKind::SelfDependency]);
    }

    #[test]
    fn test_invalid_date_range() {
        let mut acts = sample();
        acts[2].end = d(1);
        acts[2].start = d(3);
        assert!(kinds(acts).contains(&ValidationErrorKind::InvalidDateRange));
    }

    #[test]
    fn test_cyclic_dependency() {
        // 1.1 → 1.2 → 1.1
        let mut acts = sample();
        acts[2] = acts[2].clone().with_dependency("1.2");
        assert_eq!(kinds(acts), vec![ValidationErrorKind::CyclicDependency]);
    }

    #[test]
    fn test_multiple_errors() {
        let mut acts = sample();
        acts.push(Activity::task("x", d(5), d(2)).with_parent("ghost").with_dependency("ghost"));
        let errors = validate_snapshot(&ScheduleSnapshot::new(acts)).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
