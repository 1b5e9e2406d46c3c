//! Schedule compression: crashing and fast-tracking.
//!
//! Both actions work on the critical leaf tasks of a freshly computed
//! critical path, then roll the snapshot up and recompute the path so
//! group aggregates and float reflect the change.
//!
//! | Action | Selection | Effect |
//! |--------|-----------|--------|
//! | Crash | longest ⌈n × 30%⌉ critical leaf tasks | span × 0.75 (floored), cost × 1.2 |
//! | FastTrack | critical leaf tasks with a critical leaf-task predecessor | shift earlier by ⌈span × 20%⌉ days |
//!
//! Milestones are never selected. Fast-tracking moves calendar dates
//! only: durations and precedence edges are unchanged, so the computed
//! horizon stays the same while the calendar overlap appears in the
//! dates and group bounds.
//!
//! # Reference
//! PMI (2021), *PMBOK Guide*, 7th ed., "Schedule Compression"

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cpm::compute_critical_path_with;
use crate::error::Result;
use crate::models::calendar::add_days;
use crate::models::{CorrectiveAction, ScheduleSnapshot};
use crate::rollup::rollup;

/// Tuning parameters for the compression heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionSettings {
    /// Share of critical leaf tasks crashed (rounded up).
    pub crash_fraction: f64,
    /// Span multiplier for crashed tasks.
    pub crash_duration_factor: f64,
    /// Cost multiplier for crashed tasks.
    pub crash_cost_factor: f64,
    /// Share of a task's span by which fast-tracking moves it earlier.
    pub overlap_fraction: f64,
}

impl CompressionSettings {
    /// Sets the crash fraction.
    pub fn with_crash_fraction(mut self, fraction: f64) -> Self {
        self.crash_fraction = fraction;
        self
    }

    /// Sets the crash span multiplier.
    pub fn with_crash_duration_factor(mut self, factor: f64) -> Self {
        self.crash_duration_factor = factor;
        self
    }

    /// Sets the crash cost multiplier.
    pub fn with_crash_cost_factor(mut self, factor: f64) -> Self {
        self.crash_cost_factor = factor;
        self
    }

    /// Sets the fast-track overlap fraction.
    pub fn with_overlap_fraction(mut self, fraction: f64) -> Self {
        self.overlap_fraction = fraction;
        self
    }
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            crash_fraction: 0.30,
            crash_duration_factor: 0.75,
            crash_cost_factor: 1.20,
            overlap_fraction: 0.20,
        }
    }
}

/// What a corrective action changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The action applied.
    pub action: CorrectiveAction,
    /// Ids of the modified activities, in snapshot order.
    pub modified: Vec<String>,
    /// Horizon before the action (days).
    pub horizon_before: i64,
    /// Horizon after the action (days).
    pub horizon_after: i64,
    /// Change in total leaf cost.
    pub cost_delta: f64,
}

impl ActionOutcome {
    /// Days saved on the horizon (negative if it grew).
    pub fn days_saved(&self) -> i64 {
        self.horizon_before - self.horizon_after
    }

    /// Whether any activity was modified.
    pub fn is_noop(&self) -> bool {
        self.modified.is_empty()
    }
}

/// Applies a corrective action with default settings and no deadline.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_project::corrective::apply_action;
/// use u_project::models::{Activity, CorrectiveAction, ScheduleSnapshot};
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let snapshot = ScheduleSnapshot::new(vec![
///     Activity::task("A", day(1), day(9)).with_cost(1000.0),
/// ]);
/// let crashed = apply_action(&snapshot, CorrectiveAction::Crash).unwrap();
/// let a = crashed.get("A").unwrap();
/// assert_eq!(a.end, day(7)); // 8 days → 6
/// assert!((a.cost - 1200.0).abs() < 1e-9);
/// ```
pub fn apply_action(
    snapshot: &ScheduleSnapshot,
    action: CorrectiveAction,
) -> Result<ScheduleSnapshot> {
    apply_action_with(snapshot, action, &CompressionSettings::default(), None).map(|(s, _)| s)
}

/// Applies a corrective action and reports what changed.
///
/// The critical path is recomputed (honoring `deadline_days`) before
/// selection and again after the rollup. The input is never modified.
///
/// # Errors
/// Propagates critical path failures (cycles, dangling dependencies).
pub fn apply_action_with(
    snapshot: &ScheduleSnapshot,
    action: CorrectiveAction,
    settings: &CompressionSettings,
    deadline_days: Option<i64>,
) -> Result<(ScheduleSnapshot, ActionOutcome)> {
    let mut next = compute_critical_path_with(snapshot, deadline_days)?;
    let horizon_before = next.horizon_days.unwrap_or(0);
    let cost_before = next.total_leaf_cost();

    let selected: Vec<usize> = {
        let leaf_ids: HashSet<&str> = next.leaf_tasks().into_iter().map(|a| a.id.as_str()).collect();
        next.activities
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_critical() && leaf_ids.contains(a.id.as_str()))
            .map(|(i, _)| i)
            .collect()
    };
    debug!(?action, candidates = selected.len(), "critical leaf tasks selected");

    let modified = match action {
        CorrectiveAction::Crash => crash(&mut next, &selected, settings),
        CorrectiveAction::FastTrack => fast_track(&mut next, &selected, settings),
    };

    let next = compute_critical_path_with(&rollup(&next), deadline_days)?;
    let outcome = ActionOutcome {
        action,
        modified,
        horizon_before,
        horizon_after: next.horizon_days.unwrap_or(0),
        cost_delta: next.total_leaf_cost() - cost_before,
    };

    info!(
        ?action,
        modified = outcome.modified.len(),
        horizon_before = outcome.horizon_before,
        horizon_after = outcome.horizon_after,
        cost_delta = outcome.cost_delta,
        "corrective action applied"
    );
    Ok((next, outcome))
}

/// Shortens the longest critical tasks. Returns modified ids in snapshot order.
fn crash(
    snapshot: &mut ScheduleSnapshot,
    candidates: &[usize],
    settings: &CompressionSettings,
) -> Vec<String> {
    let mut ranked = candidates.to_vec();
    // Stable: ties keep snapshot order.
    ranked.sort_by_key(|&i| std::cmp::Reverse(snapshot.activities[i].span_days()));

    let fraction = settings.crash_fraction.clamp(0.0, 1.0);
    let take = (ranked.len() as f64 * fraction).ceil() as usize;
    ranked.truncate(take);
    ranked.sort_unstable();

    let mut modified = Vec::with_capacity(ranked.len());
    for i in ranked {
        let act = &mut snapshot.activities[i];
        let span = act.span_days();
        if span <= 1 {
            continue;
        }
        let new_span = (span as f64 * settings.crash_duration_factor).floor() as i64;
        let new_span = new_span.clamp(1, span);
        act.end = add_days(act.start, new_span);
        act.cost *= settings.crash_cost_factor;
        act.mark_adjusted(CorrectiveAction::Crash);
        modified.push(act.id.clone());
    }
    modified
}

/// Pulls critical tasks with a critical predecessor earlier.
fn fast_track(
    snapshot: &mut ScheduleSnapshot,
    candidates: &[usize],
    settings: &CompressionSettings,
) -> Vec<String> {
    let critical_ids: HashSet<String> = candidates
        .iter()
        .map(|&i| snapshot.activities[i].id.clone())
        .collect();

    let mut modified = Vec::new();
    for &i in candidates {
        let act = &mut snapshot.activities[i];
        let follows_critical = act
            .dependencies
            .iter()
            .any(|dep| *dep != act.id && critical_ids.contains(dep));
        if !follows_critical {
            continue;
        }
        let shift = (act.span_days() as f64 * settings.overlap_fraction).ceil() as i64;
        if shift <= 0 {
            continue;
        }
        act.start = add_days(act.start, -shift);
        act.end = add_days(act.end, -shift);
        act.mark_adjusted(CorrectiveAction::FastTrack);
        modified.push(act.id.clone());
    }
    modified
}
