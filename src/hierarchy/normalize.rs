//! Raw input → validated snapshot.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{flatten, DanglingPolicy, RootMeta};
use crate::error::{Result, ScheduleError};
use crate::graph::ActivityGraph;
use crate::models::calendar::parse_date;
use crate::models::{Activity, ActivityKind, RawActivity, ScheduleSnapshot};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Parent values that mean "top level" rather than a real reference.
const TOP_LEVEL_MARKERS: [&str; 3] = ["root", "unassigned", "none"];

/// Normalizes raw activities with the policy carried by `meta`.
///
/// Equivalent to [`normalize_with`] using `meta.dangling_policy`.
pub fn normalize(raw: &[RawActivity], meta: &RootMeta) -> Result<ScheduleSnapshot> {
    normalize_with(raw, meta, meta.dangling_policy)
}

/// Normalizes raw activities into a single-rooted, flattened snapshot.
///
/// # Repairs
/// - Missing ids become `ACT-<n>`; duplicates are renamed `<id>~<n>`.
/// - A root group is synthesized from the input date bounds when no
///   activity carries the root id.
/// - Missing, self-referencing, or unknown parents are reparented to the
///   root; parent cycles are broken the same way.
/// - Nodes that own children become groups; group cost/progress are reset
///   for the rollup to derive.
/// - Missing dates are filled, `end < start` is clamped to `start`,
///   progress is rounded into 0..=100, negative or non-finite cost is 0.
/// - Self-dependencies and repeated dependency ids are dropped.
///
/// An empty input yields an empty snapshot.
///
/// # Errors
/// [`ScheduleError::Validation`] listing every dependency that references
/// an unknown activity, unless `policy` is [`DanglingPolicy::Drop`].
pub fn normalize_with(
    raw: &[RawActivity],
    meta: &RootMeta,
    policy: DanglingPolicy,
) -> Result<ScheduleSnapshot> {
    if raw.is_empty() {
        debug!("normalize: empty input");
        return Ok(ScheduleSnapshot::empty());
    }

    let ids = assign_ids(raw);
    let id_set: HashSet<&str> = ids.iter().map(String::as_str).collect();

    let parsed: Vec<(Option<NaiveDate>, Option<NaiveDate>)> = raw
        .iter()
        .map(|r| {
            (
                r.start.as_deref().and_then(parse_date),
                r.end.as_deref().and_then(parse_date),
            )
        })
        .collect();
    let bounds_start = parsed.iter().flat_map(|(s, e)| [*s, *e]).flatten().min();
    let bounds_end = parsed.iter().flat_map(|(s, e)| [*s, *e]).flatten().max();
    let default_date = bounds_start.or(meta.fallback_start).unwrap_or_else(|| {
        warn!("normalize: no parseable dates and no fallback start; using epoch");
        NaiveDate::default()
    });

    let mut activities: Vec<Activity> = Vec::with_capacity(raw.len() + 1);
    let mut root_present = false;

    for ((record, id), (start, end)) in raw.iter().zip(&ids).zip(&parsed) {
        let (start, end) = repair_dates(id, *start, *end, default_date);
        let is_root = *id == meta.id;
        root_present |= is_root;

        let kind = if is_root {
            ActivityKind::Group
        } else {
            parse_kind(record.kind.as_deref())
        };

        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(id)
            .to_string();

        let mut act = Activity::new(id.clone(), kind, start, end).with_name(name);
        act.resource_label = record.resource.clone().unwrap_or_default();
        act.progress = sanitize_progress(record.progress);
        act.cost = sanitize_cost(record.cost);
        act.parent_id = if is_root {
            None
        } else {
            Some(resolve_parent(id, record, &id_set, &meta.id))
        };
        act.dependencies = record
            .dependencies
            .iter()
            .flatten()
            .map(|d| d.canonical())
            .collect();
        activities.push(act);
    }

    if !root_present {
        let start = bounds_start.unwrap_or(default_date);
        let end = bounds_end.unwrap_or(start).max(start);
        warn!(root = %meta.id, %start, %end, "normalize: synthesizing root group");
        let root = Activity::group(meta.id.clone(), start, end)
            .with_name(meta.name.clone())
            .with_resource(meta.resource_label.clone());
        activities.insert(0, root);
    }

    break_parent_cycles(&mut activities, &meta.id);
    promote_parents_to_groups(&mut activities);

    let errors = sanitize_dependencies(&mut activities, policy);
    if !errors.is_empty() {
        return Err(ScheduleError::from(errors));
    }

    debug!(count = activities.len(), "normalize: done");
    Ok(flatten(&ScheduleSnapshot::new(activities)))
}

/// Stringifies ids, generating missing ones and renaming duplicates.
fn assign_ids(raw: &[RawActivity]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut ids = Vec::with_capacity(raw.len());

    for (n, record) in raw.iter().enumerate() {
        let base = record
            .id
            .as_ref()
            .map(|id| id.canonical())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("ACT-{}", n + 1));

        let mut candidate = base.clone();
        let mut suffix = 2;
        while taken.contains(&candidate) {
            candidate = format!("{base}~{suffix}");
            suffix += 1;
        }
        if candidate != base {
            warn!(id = %base, renamed = %candidate, "normalize: duplicate id renamed");
        }
        taken.insert(candidate.clone());
        ids.push(candidate);
    }

    ids
}

fn parse_kind(label: Option<&str>) -> ActivityKind {
    match label.map(|l| l.trim().to_lowercase()).as_deref() {
        Some("project" | "group" | "phase" | "summary") => ActivityKind::Group,
        Some("milestone") => ActivityKind::Milestone,
        _ => ActivityKind::Task,
    }
}

fn repair_dates(
    id: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    default_date: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    match (start, end) {
        (Some(s), Some(e)) if e < s => {
            warn!(%id, %s, %e, "normalize: end before start, clamping end");
            (s, s)
        }
        (Some(s), Some(e)) => (s, e),
        (Some(s), None) => {
            warn!(%id, "normalize: missing end date");
            (s, s)
        }
        (None, Some(e)) => {
            warn!(%id, "normalize: missing start date");
            (e, e)
        }
        (None, None) => {
            warn!(%id, "normalize: missing dates");
            (default_date, default_date)
        }
    }
}

fn sanitize_progress(progress: Option<f64>) -> u8 {
    match progress {
        Some(p) if p.is_finite() => p.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

fn sanitize_cost(cost: Option<f64>) -> f64 {
    match cost {
        Some(c) if c.is_finite() && c > 0.0 => c,
        _ => 0.0,
    }
}

fn resolve_parent(
    id: &str,
    record: &RawActivity,
    id_set: &HashSet<&str>,
    root_id: &str,
) -> String {
    let parent = record.parent.as_ref().map(|p| p.canonical()).unwrap_or_default();

    if parent == root_id {
        return parent;
    }
    if !parent.is_empty() && parent != id && id_set.contains(parent.as_str()) {
        return parent;
    }
    if parent.is_empty() || TOP_LEVEL_MARKERS.contains(&parent.to_lowercase().as_str()) {
        debug!(%id, "normalize: top-level activity attached to root");
    } else {
        warn!(%id, %parent, "normalize: invalid parent, reparenting to root");
    }
    root_id.to_string()
}

/// Reparents one member of each parent cycle to the root until none remain.
fn break_parent_cycles(activities: &mut [Activity], root_id: &str) {
    loop {
        let cycle = ActivityGraph::build(activities).parent_cycle();
        let Some(cycle) = cycle else { break };
        let Some(victim) = cycle.first() else { break };
        warn!(cycle = %cycle.join(" -> "), "normalize: parent cycle, reparenting to root");
        match activities.iter_mut().find(|a| a.id == *victim) {
            Some(act) => act.parent_id = Some(root_id.to_string()),
            None => break,
        }
    }
}

/// Makes every node that owns children a group and clears its authored values.
fn promote_parents_to_groups(activities: &mut [Activity]) {
    let parents: HashSet<String> = activities
        .iter()
        .filter_map(|a| a.parent_id.clone())
        .collect();

    for act in activities.iter_mut() {
        let has_children = parents.contains(&act.id);
        if has_children && act.kind != ActivityKind::Group {
            warn!(id = %act.id, "normalize: activity owns children, promoting to group");
            act.kind = ActivityKind::Group;
        }
        if act.kind == ActivityKind::Group {
            act.cost = 0.0;
            act.progress = 0;
        }
    }
}

/// Drops self and repeated dependencies; resolves dangling ones per policy.
fn sanitize_dependencies(
    activities: &mut [Activity],
    policy: DanglingPolicy,
) -> Vec<ValidationError> {
    let known: HashSet<String> = activities.iter().map(|a| a.id.clone()).collect();
    let mut errors = Vec::new();

    for act in activities.iter_mut() {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(act.dependencies.len());

        for dep in std::mem::take(&mut act.dependencies) {
            if dep.is_empty() || !seen.insert(dep.clone()) {
                continue;
            }
            if dep == act.id {
                warn!(id = %act.id, "normalize: dropping self-dependency");
                continue;
            }
            if !known.contains(&dep) {
                match policy {
                    DanglingPolicy::Drop => {
                        warn!(id = %act.id, missing = %dep, "normalize: dropping dangling dependency");
                    }
                    DanglingPolicy::Reject => errors.push(ValidationError::new(
                        ValidationErrorKind::DanglingDependency,
                        &act.id,
                        Some(dep.clone()),
                        format!("Activity '{}' depends on unknown activity '{}'", act.id, dep),
                    )),
                }
                continue;
            }
            kept.push(dep);
        }

        act.dependencies = kept;
    }

    errors
}
