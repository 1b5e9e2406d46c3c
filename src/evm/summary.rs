//! Earned value indicators at the status date.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | BAC | Budget at completion |
//! | SV | EV − PV |
//! | CV | EV − AC |
//! | SPI | EV / PV |
//! | CPI | EV / AC |
//! | EAC | BAC / CPI |
//! | ETC | EAC − AC |
//! | VAC | BAC − EAC |
//!
//! # Reference
//! Fleming & Koppelman (2010), "Earned Value Project Management", Ch. 3

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::TimeSeriesPoint;

/// Earned value performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvmSummary {
    /// Date of the last reported point, if any.
    pub status_date: Option<NaiveDate>,
    /// Budget at completion.
    pub budget_at_completion: f64,
    /// Planned value at the status date.
    pub planned_value: f64,
    /// Earned value at the status date.
    pub earned_value: f64,
    /// Estimated actual cost at the status date.
    pub actual_cost: f64,
    /// Schedule variance (EV − PV).
    pub schedule_variance: f64,
    /// Cost variance (EV − AC).
    pub cost_variance: f64,
    /// Schedule performance index.
    pub schedule_performance_index: f64,
    /// Cost performance index.
    pub cost_performance_index: f64,
    /// Estimate at completion.
    pub estimate_at_completion: f64,
    /// Estimate to complete.
    pub estimate_to_complete: f64,
    /// Variance at completion.
    pub variance_at_completion: f64,
    /// Planned completion at the status date (0..=100).
    pub planned_percent: f64,
    /// Reported completion at the status date (0..=100).
    pub actual_percent: f64,
}

impl EvmSummary {
    /// Computes indicators from the last reported point of a curve.
    ///
    /// With no reported point, earned value and actual cost are zero and
    /// the indices default to 1.
    pub fn calculate(points: &[TimeSeriesPoint], budget: f64) -> Self {
        let status = points.iter().rev().find(|p| p.is_reported());

        let planned_value = status.map_or(0.0, |p| p.planned_value);
        let earned_value = status.and_then(|p| p.earned_value).unwrap_or(0.0);
        let actual_cost = status.and_then(|p| p.actual_cost).unwrap_or(0.0);

        let schedule_performance_index = if planned_value > 0.0 {
            earned_value / planned_value
        } else {
            1.0
        };
        let cost_performance_index = if actual_cost > 0.0 {
            earned_value / actual_cost
        } else {
            1.0
        };

        let estimate_at_completion = if cost_performance_index > 0.0 {
            budget / cost_performance_index
        } else {
            budget
        };

        Self {
            status_date: status.map(|p| p.date),
            budget_at_completion: budget,
            planned_value,
            earned_value,
            actual_cost,
            schedule_variance: earned_value - planned_value,
            cost_variance: earned_value - actual_cost,
            schedule_performance_index,
            cost_performance_index,
            estimate_at_completion,
            estimate_to_complete: (estimate_at_completion - actual_cost).max(0.0),
            variance_at_completion: budget - estimate_at_completion,
            planned_percent: status.map_or(0.0, |p| p.planned_percent),
            actual_percent: status.and_then(|p| p.actual_percent).unwrap_or(0.0),
        }
    }

    /// Whether the project is behind schedule (SPI < 1).
    pub fn is_behind_schedule(&self) -> bool {
        self.schedule_performance_index < 1.0
    }

    /// Whether the project is over budget (CPI < 1).
    pub fn is_over_budget(&self) -> bool {
        self.cost_performance_index < 1.0
    }
}
