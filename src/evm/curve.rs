//! Daily planned/earned/actual curve construction.

use chrono::NaiveDate;
use tracing::debug;

use super::aggregate::aggregate;
use super::cost_model::{ActualCostModel, AssumedEfficiency};
use crate::models::calendar::{days_between, DateSpan, ReportInterval};
use crate::models::{Activity, TimeSeriesPoint};

/// Builds an S-curve from leaf activities.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_project::evm::SCurveBuilder;
/// use u_project::models::{Activity, ReportInterval};
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let task = Activity::task("A", day(1), day(10)).with_progress(40);
///
/// let points = SCurveBuilder::new(10_000.0)
///     .with_status_date(day(5))
///     .with_interval(ReportInterval::Day)
///     .build(&[&task]);
///
/// assert_eq!(points.len(), 10);
/// assert!((points[9].planned_percent - 100.0).abs() < 1e-10);
/// assert!(points[9].actual_percent.is_none());
/// ```
#[derive(Debug)]
pub struct SCurveBuilder {
    budget: f64,
    interval: ReportInterval,
    status_date: Option<NaiveDate>,
    cost_model: Box<dyn ActualCostModel>,
}

impl SCurveBuilder {
    /// Creates a daily builder for the given total budget.
    ///
    /// Without a status date no actual-side values are produced.
    pub fn new(budget: f64) -> Self {
        Self {
            budget: if budget.is_finite() { budget.max(0.0) } else { 0.0 },
            interval: ReportInterval::Day,
            status_date: None,
            cost_model: Box::new(AssumedEfficiency::default()),
        }
    }

    /// Sets the reporting interval.
    pub fn with_interval(mut self, interval: ReportInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the status date ("today"). Days after it carry no actuals.
    pub fn with_status_date(mut self, date: NaiveDate) -> Self {
        self.status_date = Some(date);
        self
    }

    /// Sets the actual cost model.
    pub fn with_cost_model(mut self, model: impl ActualCostModel + 'static) -> Self {
        self.cost_model = Box::new(model);
        self
    }

    /// Sets a boxed actual cost model.
    pub fn with_boxed_cost_model(mut self, model: Box<dyn ActualCostModel>) -> Self {
        self.cost_model = model;
        self
    }

    /// Computes the curve over the project window of `activities`.
    ///
    /// Returns an empty series for no activities.
    pub fn build(mut self, activities: &[&Activity]) -> Vec<TimeSeriesPoint> {
        let Some(window) = project_window(activities) else {
            return Vec::new();
        };

        let count = activities.len() as f64;
        let total_days = window.day_count();
        let mut points = Vec::with_capacity(total_days as usize);

        for (i, date) in window.days().enumerate() {
            let planned_percent =
                100.0 * activities.iter().map(|a| planned_fraction(a, date)).sum::<f64>() / count;

            let actual_percent = self.status_date.filter(|today| date <= *today).map(|today| {
                let sum: f64 = activities.iter().map(|a| actual_fraction(a, date, today)).sum();
                (100.0 * sum / count).clamp(0.0, 100.0)
            });

            let planned_value = planned_percent / 100.0 * self.budget;
            let earned_value = actual_percent.map(|p| p / 100.0 * self.budget);
            let actual_cost = earned_value.map(|ev| self.cost_model.actual_cost(date, ev));

            points.push(TimeSeriesPoint {
                period_label: date.format("%Y-%m-%d").to_string(),
                date,
                day: u32::try_from(i + 1).unwrap_or(u32::MAX),
                planned_percent,
                actual_percent,
                planned_value,
                earned_value,
                actual_cost,
                schedule_performance_index: performance_index(earned_value, Some(planned_value)),
                cost_performance_index: performance_index(earned_value, actual_cost),
            });
        }

        if let Some(last) = points.last_mut() {
            last.planned_percent = 100.0;
            last.planned_value = self.budget;
            last.schedule_performance_index =
                performance_index(last.earned_value, Some(last.planned_value));
        }

        debug!(
            activities = activities.len(),
            days = total_days,
            interval = ?self.interval,
            status_date = ?self.status_date,
            "s-curve computed"
        );
        aggregate(&points, self.interval)
    }
}

/// Builds a curve with the default (CPI 1.0) actual cost model.
pub fn build_curve(
    activities: &[&Activity],
    budget: f64,
    interval: ReportInterval,
    status_date: NaiveDate,
) -> Vec<TimeSeriesPoint> {
    SCurveBuilder::new(budget)
        .with_interval(interval)
        .with_status_date(status_date)
        .build(activities)
}

/// Earliest start to latest end, inclusive.
fn project_window(activities: &[&Activity]) -> Option<DateSpan> {
    let start = activities.iter().map(|a| a.start).min()?;
    let end = activities.iter().map(|a| a.end).max()?;
    Some(DateSpan::new(start, end))
}

/// Share of an activity planned to be done by the end of `date`.
fn planned_fraction(activity: &Activity, date: NaiveDate) -> f64 {
    if date < activity.start {
        0.0
    } else if date >= activity.end {
        1.0
    } else {
        (days_between(activity.start, date) + 1) as f64 / activity.day_count() as f64
    }
}

/// Reported progress spread linearly over the days elapsed up to `today`.
fn actual_fraction(activity: &Activity, date: NaiveDate, today: NaiveDate) -> f64 {
    let reported = f64::from(activity.progress) / 100.0;
    if reported <= 0.0 {
        return 0.0;
    }
    let span = activity.day_count();
    let elapsed = |day: NaiveDate| (days_between(activity.start, day) + 1).clamp(0, span);
    let elapsed_today = elapsed(today);
    if elapsed_today == 0 {
        return if date == today { reported } else { 0.0 };
    }
    (elapsed(date) as f64 / elapsed_today as f64 * reported).clamp(0.0, reported)
}

/// EV over a denominator, 1.0 when either side is missing or the denominator is zero.
fn performance_index(earned_value: Option<f64>, denominator: Option<f64>) -> f64 {
    match (earned_value, denominator) {
        (Some(ev), Some(base)) if base > 0.0 => ev / base,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evm::SimulatedVariance;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    #[test]
    fn test_single_task_boundary() {
        let task = Activity::task("A", d(1), d(10)).with_progress(100);
        let points = build_curve(&[&task], 1000.0, ReportInterval::Day, d(10));

        assert_eq!(points.len(), 10);
        let last = points.last().unwrap();
        assert_eq!(last.date, d(10));
        assert_eq!(last.day, 10);
        assert!((last.planned_percent - 100.0).abs() < 1e-10);
        assert!((last.actual_percent.unwrap() - 100.0).abs() < 1e-10);
        assert!((last.planned_value - 1000.0).abs() < 1e-10);
        assert!((last.schedule_performance_index - 1.0).abs() < 1e-10);
        assert!((last.cost_performance_index - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_planned_fraction_is_linear() {
        let task = Activity::task("A", d(1), d(10));
        // day 1: 1/10, day 5: 5/10, end day: 1
        assert!((planned_fraction(&task, d(1)) - 0.1).abs() < 1e-10);
        assert!((planned_fraction(&task, d(5)) - 0.5).abs() < 1e-10);
        assert!((planned_fraction(&task, d(10)) - 1.0).abs() < 1e-10);
        assert!(planned_fraction(&task, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()).abs() < 1e-10);
    }

    #[test]
    fn test_actual_spreads_reported_progress() {
        let task = Activity::task("A", d(1), d(10)).with_progress(50);
        // 4 days elapsed at the status date
        assert!((actual_fraction(&task, d(4), d(4)) - 0.5).abs() < 1e-10);
        assert!((actual_fraction(&task, d(2), d(4)) - 0.25).abs() < 1e-10);
        assert!(actual_fraction(&Activity::task("B", d(1), d(10)), d(4), d(4)).abs() < 1e-10);
    }

    #[test]
    fn test_status_before_start() {
        let task = Activity::task("A", d(5), d(10)).with_progress(20);
        assert!((actual_fraction(&task, d(3), d(3)) - 0.2).abs() < 1e-10);
        assert!(actual_fraction(&task, d(2), d(3)).abs() < 1e-10);
    }

    #[test]
    fn test_actuals_stop_at_status_date() {
        let a = Activity::task("A", d(1), d(10)).with_progress(60);
        let b = Activity::task("B", d(6), d(15)).with_progress(0);
        let points = build_curve(&[&a, &b], 2000.0, ReportInterval::Day, d(6));

        assert_eq!(points.len(), 15);
        assert!(points[5].is_reported());
        assert!(!points[6].is_reported());
        assert!(points[6].earned_value.is_none());
        assert!(points[6].actual_cost.is_none());
        assert!((points[6].cost_performance_index - 1.0).abs() < 1e-10);

        // day 6: A at 60%, B at 0 → mean 30%
        assert!((points[5].actual_percent.unwrap() - 30.0).abs() < 1e-10);
        assert!((points[5].earned_value.unwrap() - 600.0).abs() < 1e-10);
        // planned: A 6/10, B 1/10 → 35%
        assert!((points[5].planned_percent - 35.0).abs() < 1e-10);
        assert!((points[5].schedule_performance_index - 600.0 / 700.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_budget() {
        let task = Activity::task("A", d(1), d(4)).with_progress(50);
        let points = build_curve(&[&task], 0.0, ReportInterval::Day, d(2));
        for p in &points {
            assert!(p.planned_value.abs() < 1e-10);
            assert!((p.schedule_performance_index - 1.0).abs() < 1e-10);
            assert!((p.cost_performance_index - 1.0).abs() < 1e-10);
        }
        assert!(points[1].actual_percent.unwrap() > 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_curve(&[], 1000.0, ReportInterval::Week, d(1)).is_empty());
    }

    #[test]
    fn test_no_status_date() {
        let task = Activity::task("A", d(1), d(3)).with_progress(50);
        let points = SCurveBuilder::new(100.0).build(&[&task]);
        assert!(points.iter().all(|p| !p.is_reported()));
    }

    #[test]
    fn test_last_point_forced_to_full_plan() {
        // the window ends on the latest end date
        let a = Activity::task("A", d(1), d(1));
        let b = Activity::task("B", d(1), d(3));
        let points = build_curve(&[&a, &b], 10.0, ReportInterval::Day, d(1));
        let last = points.last().unwrap();
        assert!((last.planned_percent - 100.0).abs() < 1e-10);
        assert!((last.planned_value - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_seeded_model_is_reproducible() {
        let task = Activity::task("A", d(1), d(20)).with_progress(80);
        let run = || {
            SCurveBuilder::new(5000.0)
                .with_status_date(d(15))
                .with_cost_model(SimulatedVariance::new(11, 0.9, 1.1))
                .build(&[&task])
        };
        assert_eq!(run(), run());
        let ac = run()[14].actual_cost.unwrap();
        let ev = run()[14].earned_value.unwrap();
        assert!(ac > ev / 1.1 - 1e-9 && ac <= ev / 0.9 + 1e-9);
    }

    #[test]
    fn test_monthly_keeps_end_of_period_values() {
        let task = Activity::task("A", d(20), NaiveDate::from_ymd_opt(2026, 2, 10).unwrap())
            .with_progress(30);
        let status = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let daily = build_curve(&[&task], 900.0, ReportInterval::Day, status);
        let monthly = build_curve(&[&task], 900.0, ReportInterval::Month, status);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].period_label, "2026-01");
        assert_eq!(monthly[0].date, d(31));
        let jan_31 = daily.iter().find(|p| p.date == d(31)).unwrap();
        assert!((monthly[0].planned_value - jan_31.planned_value).abs() < 1e-10);
        assert_eq!(monthly[0].earned_value, jan_31.earned_value);
        assert_eq!(monthly[1].date, daily.last().unwrap().date);
        assert!((monthly[1].planned_percent - 100.0).abs() < 1e-10);
    }
}
