//! Period bucketing of cumulative curves.

use crate::models::{ReportInterval, TimeSeriesPoint};

/// Buckets a chronological daily series by reporting period.
///
/// Each bucket keeps the last point of its period, relabeled with the
/// period label. Values are cumulative, so they are never averaged.
/// A daily interval returns the series unchanged.
pub fn aggregate(points: &[TimeSeriesPoint], interval: ReportInterval) -> Vec<TimeSeriesPoint> {
    let mut buckets: Vec<TimeSeriesPoint> = Vec::new();
    for point in points {
        let label = interval.period_label(point.date);
        match buckets.last_mut() {
            Some(last) if last.period_label == label => {
                *last = TimeSeriesPoint {
                    period_label: label,
                    ..point.clone()
                };
            }
            _ => buckets.push(TimeSeriesPoint {
                period_label: label,
                ..point.clone()
            }),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(date: NaiveDate, planned: f64, actual: Option<f64>) -> TimeSeriesPoint {
        TimeSeriesPoint {
            period_label: date.to_string(),
            date,
            day: 0,
            planned_percent: planned,
            actual_percent: actual,
            planned_value: planned * 10.0,
            earned_value: actual.map(|a| a * 10.0),
            actual_cost: actual.map(|a| a * 11.0),
            schedule_performance_index: 1.0,
            cost_performance_index: 1.0,
        }
    }

    fn daily(from: NaiveDate, days: i64) -> Vec<TimeSeriesPoint> {
        (0..days)
            .map(|i| {
                let date = from + chrono::Duration::days(i);
                let actual = (i < 20).then_some(i as f64);
                point(date, i as f64 * 1.5, actual)
            })
            .collect()
    }

    #[test]
    fn test_month_keeps_last_day() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let series = daily(start, 40); // Jan 15 .. Feb 23
        let monthly = aggregate(&series, ReportInterval::Month);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].period_label, "2026-01");
        assert_eq!(monthly[0].date, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        // Jan 31 is index 16
        assert!((monthly[0].planned_value - series[16].planned_value).abs() < 1e-10);
        assert_eq!(monthly[0].earned_value, series[16].earned_value);

        assert_eq!(monthly[1].period_label, "2026-02");
        assert_eq!(monthly[1].date, series[39].date);
        assert!(monthly[1].actual_percent.is_none());
    }

    #[test]
    fn test_week_and_quarter_labels() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 25).unwrap(); // Wednesday
        let series = daily(start, 14);

        let weekly = aggregate(&series, ReportInterval::Week);
        let labels: Vec<&str> = weekly.iter().map(|p| p.period_label.as_str()).collect();
        assert_eq!(labels, vec!["2026-W13", "2026-W14", "2026-W15"]);

        let quarterly = aggregate(&series, ReportInterval::Quarter);
        assert_eq!(quarterly.len(), 2);
        assert_eq!(quarterly[0].period_label, "Q1 2026");
        assert_eq!(quarterly[0].date, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        assert_eq!(quarterly[1].period_label, "Q2 2026");
    }

    #[test]
    fn test_daily_is_identity() {
        let series = daily(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 5);
        assert_eq!(aggregate(&series, ReportInterval::Day), series);
    }

    #[test]
    fn test_empty() {
        assert!(aggregate(&[], ReportInterval::Month).is_empty());
    }
}
