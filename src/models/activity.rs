//! Activity model.
//!
//! An activity is a node in two structures at once:
//! - the **work breakdown tree** (ownership, via `parent_id`), and
//! - the **precedence graph** (finish-to-start links, via `dependencies`).
//!
//! Group nodes are containers: their cost, progress and dates are derived
//! from their children by the rollup pass and never authored.
//!
//! # Reference
//! PMI (2021), "A Guide to the Project Management Body of Knowledge", Ch. 6

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::{days_between, DateSpan};
use super::resource::ResourceCategory;

/// Kind of work breakdown node.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Summary node (phase, work package). Values derived from children.
    Group,
    /// Actionable leaf work.
    #[default]
    Task,
    /// Zero-work checkpoint.
    Milestone,
}

impl ActivityKind {
    /// Sort rank among siblings: groups before tasks before milestones.
    #[inline]
    pub(crate) fn sibling_rank(self) -> u8 {
        match self {
            Self::Group => 0,
            Self::Task => 1,
            Self::Milestone => 2,
        }
    }
}

/// A schedule-compression heuristic applied to an activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectiveAction {
    /// Shorten the activity by adding cost.
    Crash,
    /// Overlap the activity with its critical predecessor.
    FastTrack,
}

impl CorrectiveAction {
    /// Annotation appended to the names of modified activities.
    pub fn name_suffix(self) -> &'static str {
        match self {
            Self::Crash => "(Crashed)",
            Self::FastTrack => "(Fast-Tracked)",
        }
    }
}

/// Critical path results for one activity.
///
/// Offsets are whole days relative to project time zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CpmData {
    /// Duration used by the passes (at least 1 day).
    pub duration: i64,
    /// Earliest start offset.
    pub early_start: i64,
    /// Earliest finish offset.
    pub early_finish: i64,
    /// Latest start offset.
    pub late_start: i64,
    /// Latest finish offset.
    pub late_finish: i64,
    /// Total float (`late_start - early_start`). Negative under a forced deadline.
    pub float: i64,
    /// Whether `float <= 0`.
    pub is_critical: bool,
}

/// A work breakdown node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier, stable across recomputation.
    pub id: String,
    /// Node kind.
    pub kind: ActivityKind,
    /// Display label.
    pub name: String,
    /// Owning group. `None` only for the root.
    pub parent_id: Option<String>,
    /// First calendar day.
    pub start: NaiveDate,
    /// Last calendar day (`end >= start`).
    pub end: NaiveDate,
    /// Percent complete (0..=100).
    pub progress: u8,
    /// Cost. Authored on leaves, summed on groups.
    pub cost: f64,
    /// Free-text resource tag, e.g. `"Crane (Equipment)"`.
    pub resource_label: String,
    /// Predecessor activity ids.
    pub dependencies: Vec<String>,
    /// Depth in the tree (root = 0). Set by flattening.
    pub depth: usize,
    /// Corrective actions applied so far, oldest first.
    pub adjustments: Vec<CorrectiveAction>,
    /// Critical path results from the last pass.
    pub cpm: Option<CpmData>,
}

impl Activity {
    /// Creates an activity of the given kind.
    pub fn new(id: impl Into<String>, kind: ActivityKind, start: NaiveDate, end: NaiveDate) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            parent_id: None,
            start,
            end,
            progress: 0,
            cost: 0.0,
            resource_label: String::new(),
            dependencies: Vec::new(),
            depth: 0,
            adjustments: Vec::new(),
            cpm: None,
        }
    }

    /// Creates a task.
    pub fn task(id: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(id, ActivityKind::Task, start, end)
    }

    /// Creates a group.
    pub fn group(id: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(id, ActivityKind::Group, start, end)
    }

    /// Creates a single-day milestone.
    pub fn milestone(id: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(id, ActivityKind::Milestone, date, date)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning group.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets percent complete (clamped to 100).
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    /// Sets the cost.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the resource tag.
    pub fn with_resource(mut self, label: impl Into<String>) -> Self {
        self.resource_label = label.into();
        self
    }

    /// Adds a predecessor.
    pub fn with_dependency(mut self, predecessor_id: impl Into<String>) -> Self {
        self.dependencies.push(predecessor_id.into());
        self
    }

    /// Calendar span in days (`end - start`). Zero for same-day activities.
    #[inline]
    pub fn span_days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    /// Duration used by the critical path passes: `max(1, end - start)`.
    #[inline]
    pub fn cpm_duration(&self) -> i64 {
        self.span_days().max(1)
    }

    /// Inclusive day count of the activity window.
    #[inline]
    pub fn day_count(&self) -> i64 {
        self.span_days() + 1
    }

    /// The activity window as a date span.
    pub fn date_span(&self) -> DateSpan {
        DateSpan::new(self.start, self.end)
    }

    /// Whether this node is a group.
    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind == ActivityKind::Group
    }

    /// Whether the last critical path pass marked this activity critical.
    #[inline]
    pub fn is_critical(&self) -> bool {
        self.cpm.is_some_and(|c| c.is_critical)
    }

    /// Total float from the last pass.
    pub fn float(&self) -> Option<i64> {
        self.cpm.map(|c| c.float)
    }

    /// Resource category parsed from the label.
    pub fn resource_category(&self) -> ResourceCategory {
        ResourceCategory::classify(&self.resource_label)
    }

    /// Records a corrective action and annotates the name once per action kind.
    pub(crate) fn mark_adjusted(&mut self, action: CorrectiveAction) {
        let suffix = action.name_suffix();
        if !self.name.ends_with(suffix) && !self.adjustments.contains(&action) {
            self.name = format!("{} {}", self.name, suffix);
        }
        self.adjustments.push(action);
    }
}
