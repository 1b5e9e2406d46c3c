//! Critical path method (CPM).
//!
//! # Algorithm
//!
//! 1. Duration = max(1, end − start) in days.
//! 2. Topological order of the precedence graph (Kahn). A cycle aborts
//!    with [`ScheduleError::CycleDetected`].
//! 3. Forward pass: ES = max(pred.EF), default 0; EF = ES + duration.
//! 4. Horizon = max(EF), optionally tightened by a deadline.
//! 5. Backward pass over successors: LF = min(succ.LS), default horizon;
//!    LS = LF − duration.
//! 6. Float = LS − ES; critical iff float ≤ 0.
//!
//! Every activity takes part, groups included. Offsets are whole days
//! from project time zero.
//!
//! # Complexity
//! O(V + E) after the arena is built.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::graph::ActivityGraph;
use crate::models::calendar::days_between;
use crate::models::{Activity, CpmData, ScheduleSnapshot};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Computes early/late dates, float, and criticality for every activity.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_project::cpm::compute_critical_path;
/// use u_project::models::{Activity, ScheduleSnapshot};
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let snapshot = ScheduleSnapshot::new(vec![
///     Activity::task("A", day(1), day(4)),
///     Activity::task("B", day(4), day(9)).with_dependency("A"),
/// ]);
/// let result = compute_critical_path(&snapshot).unwrap();
/// assert_eq!(result.horizon_days, Some(8));
/// assert!(result.get("A").unwrap().is_critical());
/// ```
///
/// # Errors
/// - [`ScheduleError::CycleDetected`] if the dependencies are cyclic.
/// - [`ScheduleError::Validation`] if a dependency does not resolve.
pub fn compute_critical_path(snapshot: &ScheduleSnapshot) -> Result<ScheduleSnapshot> {
    compute_critical_path_with(snapshot, None)
}

/// Like [`compute_critical_path`], with an optional deadline in days.
///
/// The deadline replaces the horizon as the default late finish when it
/// is earlier, which yields negative float on activities that can no
/// longer make it. A later deadline has no effect.
pub fn compute_critical_path_with(
    snapshot: &ScheduleSnapshot,
    deadline_days: Option<i64>,
) -> Result<ScheduleSnapshot> {
    if snapshot.is_empty() {
        return Ok(snapshot.clone());
    }

    let activities = &snapshot.activities;
    let graph = ActivityGraph::build(activities);

    let dangling: Vec<ValidationError> = graph
        .unresolved_dependencies()
        .iter()
        .map(|(i, missing)| {
            let id = graph.id(*i);
            ValidationError::new(
                ValidationErrorKind::DanglingDependency,
                id,
                Some(missing.clone()),
                format!("Activity '{id}' depends on unknown activity '{missing}'"),
            )
        })
        .collect();
    if !dangling.is_empty() {
        return Err(ScheduleError::from(dangling));
    }

    let order = graph.topological_order()?;
    let n = graph.len();
    let duration: Vec<i64> = activities.iter().map(Activity::cpm_duration).collect();

    let mut early_start = vec![0i64; n];
    let mut early_finish = vec![0i64; n];
    for &i in &order {
        early_start[i] = graph
            .predecessors(i)
            .iter()
            .map(|&p| early_finish[p])
            .max()
            .unwrap_or(0);
        early_finish[i] = early_start[i] + duration[i];
    }

    let horizon = early_finish.iter().copied().max().unwrap_or(0);
    let target = deadline_days.map_or(horizon, |d| d.min(horizon));

    let mut late_start = vec![0i64; n];
    let mut late_finish = vec![0i64; n];
    for &i in order.iter().rev() {
        late_finish[i] = graph
            .successors(i)
            .iter()
            .map(|&s| late_start[s])
            .min()
            .unwrap_or(target);
        late_start[i] = late_finish[i] - duration[i];
    }

    let mut next = snapshot.clone();
    let mut critical = 0usize;
    for (i, act) in next.activities.iter_mut().enumerate() {
        let float = late_start[i] - early_start[i];
        let is_critical = float <= 0;
        critical += usize::from(is_critical);
        act.cpm = Some(CpmData {
            duration: duration[i],
            early_start: early_start[i],
            early_finish: early_finish[i],
            late_start: late_start[i],
            late_finish: late_finish[i],
            float,
            is_critical,
        });
    }
    next.horizon_days = Some(horizon);

    debug!(activities = n, critical, horizon, ?deadline_days, "critical path computed");
    Ok(next)
}

/// Deadline offset (days from the project start) for a forced finish date.
///
/// The project start is the root's start, or the earliest activity start
/// when there is no root.
pub fn deadline_offset(snapshot: &ScheduleSnapshot, forced_finish: NaiveDate) -> Option<i64> {
    let start = snapshot
        .root()
        .map(|r| r.start)
        .or_else(|| snapshot.bounds().map(|b| b.start))?;
    Some(days_between(start, forced_finish))
}

/// Critical leaf-level chain: critical non-group activities in precedence order.
///
/// # Errors
/// [`ScheduleError::CycleDetected`] if the dependencies are cyclic.
pub fn critical_path(snapshot: &ScheduleSnapshot) -> Result<Vec<&Activity>> {
    let graph = ActivityGraph::build(&snapshot.activities);
    let order = graph.topological_order()?;
    Ok(order
        .into_iter()
        .map(|i| &snapshot.activities[i])
        .filter(|a| a.is_critical() && !a.is_group())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    /// Task starting on Jan 1 spanning `len` days.
    fn task(id: &str, len: u32) -> Activity {
        Activity::task(id, d(1), d(1 + len))
    }

    fn cpm(s: &ScheduleSnapshot, id: &str) -> CpmData {
        s.get(id).and_then(|a| a.cpm).unwrap()
    }

    #[test]
    fn test_two_task_chain() {
        let s = ScheduleSnapshot::new(vec![task("A", 3), task("B", 5).with_dependency("A")]);
        let r = compute_critical_path(&s).unwrap();

        let a = cpm(&r, "A");
        let b = cpm(&r, "B");
        assert_eq!(a.early_finish, 3);
        assert_eq!(b.early_start, 3);
        assert_eq!(b.early_finish, 8);
        assert_eq!(r.horizon_days, Some(8));
        assert_eq!(a.float, 0);
        assert_eq!(b.float, 0);
        assert!(a.is_critical && b.is_critical);
    }

    #[test]
    fn test_parallel_float() {
        let s = ScheduleSnapshot::new(vec![task("A", 2), task("B", 4), task("C", 6)]);
        let r = compute_critical_path(&s).unwrap();
        assert_eq!(cpm(&r, "A").float, 4);
        assert_eq!(cpm(&r, "B").float, 2);
        assert_eq!(cpm(&r, "C").float, 0);
        let critical: Vec<&str> = r.critical_activities().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(critical, vec!["C"]);
    }

    #[test]
    fn test_diamond() {
        // A → {B(2), C(5)} → D
        let s = ScheduleSnapshot::new(vec![
            task("A", 1),
            task("B", 2).with_dependency("A"),
            task("C", 5).with_dependency("A"),
            task("D", 1).with_dependency("B").with_dependency("C"),
        ]);
        let r = compute_critical_path(&s).unwrap();
        assert_eq!(r.horizon_days, Some(7));
        assert_eq!(cpm(&r, "D").early_start, 6);
        assert_eq!(cpm(&r, "B").float, 3);
        assert_eq!(cpm(&r, "B").late_finish, 6);
        assert!(cpm(&r, "C").is_critical);
        let path: Vec<&str> = critical_path(&r).unwrap().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(path, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_zero_span_floored_to_one_day() {
        let s = ScheduleSnapshot::new(vec![
            Activity::milestone("M", d(5)),
            task("T", 2).with_dependency("M"),
        ]);
        let r = compute_critical_path(&s).unwrap();
        assert_eq!(cpm(&r, "M").duration, 1);
        assert_eq!(cpm(&r, "T").early_start, 1);
        assert_eq!(r.horizon_days, Some(3));
    }

    #[test]
    fn test_cycle_detected() {
        let s = ScheduleSnapshot::new(vec![
            task("A", 1).with_dependency("B"),
            task("B", 1).with_dependency("A"),
        ]);
        match compute_critical_path(&s) {
            Err(ScheduleError::CycleDetected { ids }) => {
                assert!(ids.contains(&"A".to_string()));
                assert!(ids.contains(&"B".to_string()));
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_dependency_rejected() {
        let s = ScheduleSnapshot::new(vec![task("A", 1).with_dependency("ghost")]);
        let err = compute_critical_path(&s).unwrap_err();
        assert_eq!(err.involved_ids(), vec!["A", "ghost"]);
    }

    #[test]
    fn test_deadline_yields_negative_float() {
        let s = ScheduleSnapshot::new(vec![task("A", 3), task("B", 5).with_dependency("A")]);
        let r = compute_critical_path_with(&s, Some(6)).unwrap();
        assert_eq!(cpm(&r, "B").late_finish, 6);
        assert_eq!(cpm(&r, "B").float, -2);
        assert_eq!(cpm(&r, "A").float, -2);
        assert!(cpm(&r, "A").is_critical);
        // horizon still reports the computed finish
        assert_eq!(r.horizon_days, Some(8));
    }

    #[test]
    fn test_later_deadline_has_no_effect() {
        let s = ScheduleSnapshot::new(vec![task("A", 3), task("B", 5)]);
        let loose = compute_critical_path_with(&s, Some(50)).unwrap();
        assert_eq!(loose, compute_critical_path(&s).unwrap());
    }

    #[test]
    fn test_groups_take_part() {
        let s = ScheduleSnapshot::new(vec![
            Activity::group("R", d(1), d(9)),
            task("A", 3).with_parent("R"),
            task("B", 5).with_parent("R").with_dependency("A"),
        ]);
        let r = compute_critical_path(&s).unwrap();
        assert!(r.has_cpm());
        assert_eq!(cpm(&r, "R").duration, 8);
        assert_eq!(cpm(&r, "R").float, 0);
        let path: Vec<&str> = critical_path(&r).unwrap().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(path, vec!["A", "B"]);
    }

    #[test]
    fn test_deadline_offset() {
        let s = ScheduleSnapshot::new(vec![
            Activity::group("R", d(2), d(9)),
            task("A", 3).with_parent("R"),
        ]);
        assert_eq!(deadline_offset(&s, d(8)), Some(6));
        assert_eq!(deadline_offset(&ScheduleSnapshot::empty(), d(8)), None);
    }

    #[test]
    fn test_deterministic_and_pure() {
        let s = ScheduleSnapshot::new(vec![task("A", 3), task("B", 5).with_dependency("A")]);
        let before = s.clone();
        let r1 = compute_critical_path(&s).unwrap();
        let r2 = compute_critical_path(&s).unwrap();
        assert_eq!(r1, r2);
        assert_eq!(s, before);
    }

    #[test]
    fn test_empty() {
        let r = compute_critical_path(&ScheduleSnapshot::empty()).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.horizon_days, None);
    }
}
