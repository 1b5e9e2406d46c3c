//! Bottom-up aggregation through the work breakdown tree.
//!
//! For every group with children:
//!
//! | Field | Rule |
//! |-------|------|
//! | cost | Σ child.cost |
//! | progress | round(Σ child.progress × child.cost / Σ child.cost), or the plain mean when Σ cost = 0 |
//! | start | min(child.start) |
//! | end | max(child.end) |
//!
//! Leaves (and childless groups) pass through unchanged. Children are
//! always aggregated before their parent, so nested groups roll up in a
//! single pass. The result is a fixed point: rolling up twice changes
//! nothing.

use tracing::debug;

use crate::graph::ActivityGraph;
use crate::models::ScheduleSnapshot;

/// Recomputes group cost, progress, and date bounds from their children.
pub fn rollup(snapshot: &ScheduleSnapshot) -> ScheduleSnapshot {
    let graph = ActivityGraph::build(&snapshot.activities);
    let mut next = snapshot.clone();
    let mut groups_updated = 0usize;

    for i in graph.tree_post_order() {
        let kids = graph.children(i);
        if kids.is_empty() || !next.activities[i].is_group() {
            continue;
        }

        let mut total_cost = 0.0;
        let mut weighted_progress = 0.0;
        let mut progress_sum = 0.0;
        let mut start = next.activities[kids[0]].start;
        let mut end = next.activities[kids[0]].end;

        for &c in kids {
            let child = &next.activities[c];
            total_cost += child.cost;
            weighted_progress += f64::from(child.progress) * child.cost;
            progress_sum += f64::from(child.progress);
            start = start.min(child.start);
            end = end.max(child.end);
        }

        let progress = if total_cost > 0.0 {
            weighted_progress / total_cost
        } else {
            progress_sum / kids.len() as f64
        };

        let group = &mut next.activities[i];
        group.cost = total_cost;
        group.progress = progress.round().clamp(0.0, 100.0) as u8;
        group.start = start;
        group.end = end;
        groups_updated += 1;
    }

    debug!(groups = groups_updated, "rollup complete");
    next
}
