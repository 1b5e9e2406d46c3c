//! Time-phased progress curve points.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One reporting period of a planned/earned/actual curve.
///
/// All values are cumulative up to and including `date`. Actual-side
/// values are `None` for periods after the status date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Period label (`2026-03-05`, `2026-W10`, `2026-03`, `Q1 2026`).
    pub period_label: String,
    /// Last day represented by this point.
    pub date: NaiveDate,
    /// 1-based day index of `date` within the project window.
    pub day: u32,
    /// Planned completion (0..=100).
    pub planned_percent: f64,
    /// Reported completion (0..=100).
    pub actual_percent: Option<f64>,
    /// Planned value (PV).
    pub planned_value: f64,
    /// Earned value (EV).
    pub earned_value: Option<f64>,
    /// Estimated actual cost (AC). Modeled, not measured.
    pub actual_cost: Option<f64>,
    /// SPI = EV / PV.
    pub schedule_performance_index: f64,
    /// CPI = EV / AC.
    pub cost_performance_index: f64,
}

impl TimeSeriesPoint {
    /// Whether the point lies on or before the status date.
    #[inline]
    pub fn is_reported(&self) -> bool {
        self.actual_percent.is_some()
    }

    /// Schedule variance (EV - PV), when reported.
    pub fn schedule_variance(&self) -> Option<f64> {
        self.earned_value.map(|ev| ev - self.planned_value)
    }

    /// Cost variance (EV - AC), when reported.
    pub fn cost_variance(&self) -> Option<f64> {
        match (self.earned_value, self.actual_cost) {
            (Some(ev), Some(ac)) => Some(ev - ac),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variances() {
        let p = TimeSeriesPoint {
            period_label: "2026-01".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            day: 31,
            planned_percent: 50.0,
            actual_percent: Some(40.0),
            planned_value: 500.0,
            earned_value: Some(400.0),
            actual_cost: Some(450.0),
            schedule_performance_index: 0.8,
            cost_performance_index: 400.0 / 450.0,
        };
        assert!(p.is_reported());
        assert_eq!(p.schedule_variance(), Some(-100.0));
        assert_eq!(p.cost_variance(), Some(-50.0));

        let future = TimeSeriesPoint {
            actual_percent: None,
            earned_value: None,
            actual_cost: None,
            ..p
        };
        assert!(!future.is_reported());
        assert_eq!(future.schedule_variance(), None);
        assert_eq!(future.cost_variance(), None);
    }
}
