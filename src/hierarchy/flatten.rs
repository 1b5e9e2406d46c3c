//! Presentation order and root overrides.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::graph::ActivityGraph;
use crate::models::{Activity, ScheduleSnapshot};

/// Orders a snapshot depth-first, parents before children.
///
/// Siblings are ordered by:
/// 1. Leading numeric id prefix (`"1.2"` → 1.2); numeric ids first
/// 2. Kind: groups, then tasks, then milestones
/// 3. Start date
/// 4. Id
///
/// Every activity gets its `depth` (root = 0). Nodes unreachable from a
/// parentless node are appended in their original order.
pub fn flatten(snapshot: &ScheduleSnapshot) -> ScheduleSnapshot {
    let activities = &snapshot.activities;
    let graph = ActivityGraph::build(activities);
    let n = graph.len();

    let mut visited = vec![false; n];
    let mut order: Vec<(usize, usize)> = Vec::with_capacity(n);

    let tops: Vec<usize> = (0..n).filter(|&i| graph.parent(i).is_none()).collect();
    for start in tops.into_iter().chain(0..n) {
        if visited[start] {
            continue;
        }
        let mut stack = vec![(start, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            order.push((node, depth));

            let mut kids: Vec<usize> = graph
                .children(node)
                .iter()
                .copied()
                .filter(|&c| !visited[c])
                .collect();
            kids.sort_by(|&a, &b| sibling_order(&activities[a], &activities[b]));
            // Reverse so the first sibling is popped first.
            stack.extend(kids.into_iter().rev().map(|c| (c, depth + 1)));
        }
    }

    let flattened = order
        .into_iter()
        .map(|(i, depth)| {
            let mut act = activities[i].clone();
            act.depth = depth;
            act
        })
        .collect();

    ScheduleSnapshot {
        activities: flattened,
        horizon_days: snapshot.horizon_days,
    }
}

fn sibling_order(a: &Activity, b: &Activity) -> Ordering {
    let numeric = match (leading_number(&a.id), leading_number(&b.id)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    numeric
        .then_with(|| a.kind.sibling_rank().cmp(&b.kind.sibling_rank()))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.id.cmp(&b.id))
}

/// Longest decimal prefix of an id (`"1.2.3"` → 1.2, `"12a"` → 12).
fn leading_number(id: &str) -> Option<f64> {
    let s = id.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&c) = bytes.get(end) {
        match c {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}

/// Overrides the root's dates with forced project bounds.
///
/// Applied after rollup, so the override survives until the next rollup.
/// A forced finish earlier than the start is clamped to the start.
pub fn apply_root_constraints(
    snapshot: &ScheduleSnapshot,
    forced_start: Option<NaiveDate>,
    forced_finish: Option<NaiveDate>,
) -> ScheduleSnapshot {
    let mut next = snapshot.clone();
    if forced_start.is_none() && forced_finish.is_none() {
        return next;
    }

    if let Some(root) = next.activities.iter_mut().find(|a| a.parent_id.is_none()) {
        if let Some(start) = forced_start {
            root.start = start;
        }
        if let Some(finish) = forced_finish {
            root.end = finish;
        }
        if root.end < root.start {
            warn!(start = %root.start, end = %root.end, "forced finish precedes start, clamping");
            root.end = root.start;
        }
        debug!(start = %root.start, end = %root.end, "root constraints applied");
    }
    next
}
