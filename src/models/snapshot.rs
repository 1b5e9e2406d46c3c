//! Schedule snapshot model.
//!
//! A snapshot is the full ordered activity collection at one point in
//! time. It is treated as a value: every engine stage borrows a snapshot
//! and returns a new one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::calendar::DateSpan;
use super::{Activity, ActivityKind};

/// An ordered, point-in-time collection of activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    /// Activities in presentation order (parent before child once flattened).
    pub activities: Vec<Activity>,
    /// Project horizon in days from the last critical path pass.
    pub horizon_days: Option<i64>,
}

impl ScheduleSnapshot {
    /// Creates a snapshot from activities.
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities,
            horizon_days: None,
        }
    }

    /// Creates an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of activities.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether there are no activities.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Iterates activities in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }

    /// Finds an activity by id.
    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// The root group (the node without a parent).
    pub fn root(&self) -> Option<&Activity> {
        self.activities.iter().find(|a| a.parent_id.is_none())
    }

    /// Direct children of a node, in snapshot order.
    pub fn children_of(&self, id: &str) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| a.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self, id: &str) -> bool {
        !self
            .activities
            .iter()
            .any(|a| a.parent_id.as_deref() == Some(id))
    }

    /// All nodes without children.
    pub fn leaves(&self) -> Vec<&Activity> {
        let parents = self.parent_ids();
        self.activities
            .iter()
            .filter(|a| !parents.contains(a.id.as_str()))
            .collect()
    }

    /// Leaf tasks: the activities that carry authored work and cost.
    ///
    /// Milestones and groups are excluded. This is the population used by
    /// progress curves and corrective actions.
    pub fn leaf_tasks(&self) -> Vec<&Activity> {
        let parents = self.parent_ids();
        self.activities
            .iter()
            .filter(|a| a.kind == ActivityKind::Task && !parents.contains(a.id.as_str()))
            .collect()
    }

    fn parent_ids(&self) -> HashSet<&str> {
        self.activities
            .iter()
            .filter_map(|a| a.parent_id.as_deref())
            .collect()
    }

    /// Activities marked critical by the last critical path pass.
    pub fn critical_activities(&self) -> Vec<&Activity> {
        self.activities.iter().filter(|a| a.is_critical()).collect()
    }

    /// Whether every activity carries critical path results.
    pub fn has_cpm(&self) -> bool {
        self.horizon_days.is_some() && self.activities.iter().all(|a| a.cpm.is_some())
    }

    /// Earliest start and latest end over all activities.
    pub fn bounds(&self) -> Option<DateSpan> {
        self.activities
            .iter()
            .map(Activity::date_span)
            .reduce(|acc, span| acc.union(&span))
    }

    /// Sum of leaf costs (equals the root cost after rollup).
    pub fn total_leaf_cost(&self) -> f64 {
        self.leaves().iter().map(|a| a.cost).sum()
    }
}

impl<'a> IntoIterator for &'a ScheduleSnapshot {
    type Item = &'a Activity;
    type IntoIter = std::slice::Iter<'a, Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.activities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn sample() -> ScheduleSnapshot {
        ScheduleSnapshot::new(vec![
            Activity::group("R", d(1), d(20)),
            Activity::group("1", d(1), d(10)).with_parent("R"),
            Activity::task("1.1", d(1), d(5)).with_parent("1").with_cost(100.0),
            Activity::task("1.2", d(5), d(10)).with_parent("1").with_cost(300.0),
            Activity::milestone("M", d(20)).with_parent("R"),
        ])
    }

    #[test]
    fn test_lookup() {
        let s = sample();
        assert_eq!(s.len(), 5);
        assert_eq!(s.get("1.2").map(|a| a.cost), Some(300.0));
        assert!(s.get("9").is_none());
        assert_eq!(s.root().map(|a| a.id.as_str()), Some("R"));
    }

    #[test]
    fn test_tree_queries() {
        let s = sample();
        let kids: Vec<&str> = s.children_of("1").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(kids, vec!["1.1", "1.2"]);
        assert!(s.is_leaf("1.1"));
        assert!(!s.is_leaf("R"));
        assert_eq!(s.leaves().len(), 3);
        let tasks: Vec<&str> = s.leaf_tasks().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(tasks, vec!["1.1", "1.2"]);
    }

    #[test]
    fn test_bounds_and_cost() {
        let s = sample();
        assert_eq!(s.bounds(), Some(DateSpan::new(d(1), d(20))));
        assert!((s.total_leaf_cost() - 400.0).abs() < 1e-10);
    }

    #[test]
    fn test_leaves_with_shared_parents() {
        let mut acts = vec![Activity::group("R", d(1), d(28))];
        for g in 0..5 {
            let gid = format!("G{g}");
            acts.push(Activity::group(gid.clone(), d(1), d(28)).with_parent("R"));
            for t in 0..4 {
                acts.push(Activity::task(format!("G{g}.{t}"), d(1), d(2)).with_parent(gid.clone()));
            }
            acts.push(Activity::milestone(format!("G{g}.M"), d(28)).with_parent(gid.clone()));
        }
        let s = ScheduleSnapshot::new(acts);

        assert_eq!(s.leaves().len(), 25);
        let tasks = s.leaf_tasks();
        assert_eq!(tasks.len(), 20);
        assert_eq!(tasks[0].id, "G0.0");
        assert!(tasks.iter().all(|a| s.is_leaf(&a.id)));
        assert!(s.leaves().iter().all(|a| !a.is_group()));
    }

    #[test]
    fn test_empty_snapshot() {
        let s = ScheduleSnapshot::empty();
        assert!(s.is_empty());
        assert!(s.root().is_none());
        assert!(s.bounds().is_none());
        assert!(!s.has_cpm());
        assert!(s.critical_activities().is_empty());
    }
}
