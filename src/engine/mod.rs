//! End-to-end scheduling pipeline.
//!
//! [`ScheduleEngine`] chains the stages in the order a host needs them:
//!
//! ```text
//! build:        normalize → rollup → root constraints → flatten → CPM
//! apply_action: action (CPM → edit → rollup → CPM) → root constraints → flatten → CPM
//! report:       leaf tasks → daily curve → summary → bucketing
//! ```
//!
//! The engine holds configuration only. Every call borrows its inputs and
//! returns fresh values.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use u_project::engine::{EngineConfig, ProjectCriteria, ScheduleEngine};
//! use u_project::models::{CorrectiveAction, RawActivity, ReportInterval};
//!
//! let raw = vec![
//!     RawActivity::new("1").with_name("Design").with_kind("task")
//!         .with_dates("2026-01-01", "2026-01-11").with_cost(4000.0).with_progress(50.0),
//!     RawActivity::new("2").with_name("Build").with_kind("task")
//!         .with_dates("2026-01-11", "2026-01-31").with_cost(6000.0).with_dependency("1"),
//! ];
//! let criteria = ProjectCriteria::new(10_000.0)
//!     .with_title("Pilot")
//!     .with_interval(ReportInterval::Week);
//!
//! let engine = ScheduleEngine::new(EngineConfig::default());
//! let snapshot = engine.build(&raw, &criteria).unwrap();
//! assert_eq!(snapshot.horizon_days, Some(30));
//!
//! let (crashed, outcome) = engine
//!     .apply_action(&snapshot, CorrectiveAction::Crash, &criteria)
//!     .unwrap();
//! assert_eq!(outcome.modified, vec!["2"]);
//!
//! let status = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
//! let report = engine.report(&crashed, &criteria, status);
//! assert!(!report.points.is_empty());
//! assert!(report.summary.earned_value > 0.0);
//! ```

mod config;

pub use config::{CostModelConfig, EngineConfig, ProjectCriteria};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corrective::{apply_action_with, ActionOutcome};
use crate::cpm::{compute_critical_path_with, deadline_offset};
use crate::error::Result;
use crate::evm::{aggregate, EvmSummary, SCurveBuilder};
use crate::hierarchy::{apply_root_constraints, flatten, normalize};
use crate::models::{
    CorrectiveAction, RawActivity, ReportInterval, ResourceBreakdown, ScheduleSnapshot,
    TimeSeriesPoint,
};
use crate::rollup::rollup;

/// Progress report for one status date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Curve points at the requested interval.
    pub points: Vec<TimeSeriesPoint>,
    /// Indicators at the status date.
    pub summary: EvmSummary,
    /// Leaf cost by resource category.
    pub resources: ResourceBreakdown,
    /// Currency code from the criteria. Display only.
    pub currency: String,
}

/// Scheduling pipeline over immutable snapshots.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: EngineConfig,
}

impl ScheduleEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds a finalized snapshot from raw input.
    ///
    /// # Errors
    /// - Validation errors for unresolvable dependencies (under the
    ///   reject policy).
    /// - [`ScheduleError::CycleDetected`](crate::error::ScheduleError::CycleDetected)
    ///   for cyclic dependencies.
    pub fn build(&self, raw: &[RawActivity], criteria: &ProjectCriteria) -> Result<ScheduleSnapshot> {
        let mut meta = self.config.root.clone();
        if !criteria.title.trim().is_empty() {
            meta = meta.with_title(criteria.title.trim());
        }
        if meta.fallback_start.is_none() {
            meta.fallback_start = criteria.forced_start;
        }

        let normalized = normalize(raw, &meta)?;
        let snapshot = self.finalize(&rollup(&normalized), criteria)?;
        debug!(
            activities = snapshot.len(),
            horizon = ?snapshot.horizon_days,
            "schedule built"
        );
        Ok(snapshot)
    }

    /// Applies a corrective action and refinalizes the snapshot.
    ///
    /// The outcome's `horizon_after` reflects the refinalized snapshot.
    pub fn apply_action(
        &self,
        snapshot: &ScheduleSnapshot,
        action: CorrectiveAction,
        criteria: &ProjectCriteria,
    ) -> Result<(ScheduleSnapshot, ActionOutcome)> {
        let deadline = Self::deadline(snapshot, criteria);
        let (adjusted, mut outcome) =
            apply_action_with(snapshot, action, &self.config.compression, deadline)?;
        let finalized = self.finalize(&adjusted, criteria)?;
        outcome.horizon_after = finalized.horizon_days.unwrap_or(0);
        Ok((finalized, outcome))
    }

    /// Builds the progress report for the leaf tasks of a snapshot.
    ///
    /// The summary is taken from the daily series before bucketing, so a
    /// status date inside a period is reported exactly.
    pub fn report(
        &self,
        snapshot: &ScheduleSnapshot,
        criteria: &ProjectCriteria,
        status_date: NaiveDate,
    ) -> ProgressReport {
        let leaves = snapshot.leaf_tasks();
        let daily = SCurveBuilder::new(criteria.budget)
            .with_interval(ReportInterval::Day)
            .with_status_date(status_date)
            .with_boxed_cost_model(self.config.cost_model.build())
            .build(&leaves);

        let summary = EvmSummary::calculate(&daily, criteria.budget.max(0.0));
        let points = aggregate(&daily, criteria.interval);

        debug!(
            points = points.len(),
            spi = summary.schedule_performance_index,
            cpi = summary.cost_performance_index,
            "progress report computed"
        );
        ProgressReport {
            points,
            summary,
            resources: ResourceBreakdown::from_activities(leaves),
            currency: criteria.currency.clone(),
        }
    }

    /// Root constraints, presentation order, and a fresh critical path.
    fn finalize(&self, snapshot: &ScheduleSnapshot, criteria: &ProjectCriteria) -> Result<ScheduleSnapshot> {
        let constrained =
            apply_root_constraints(snapshot, criteria.forced_start, criteria.forced_finish);
        let flat = flatten(&constrained);
        let deadline = Self::deadline(&flat, criteria);
        compute_critical_path_with(&flat, deadline)
    }

    fn deadline(snapshot: &ScheduleSnapshot, criteria: &ProjectCriteria) -> Option<i64> {
        criteria
            .forced_finish
            .and_then(|finish| deadline_offset(snapshot, finish))
    }
}
