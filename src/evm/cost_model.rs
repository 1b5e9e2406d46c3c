//! Actual cost estimation.
//!
//! No cost-actuals feed exists, so actual cost (AC) is modeled from earned
//! value. Every model here produces an estimate, not a measurement. Hosts
//! with real actuals implement [`ActualCostModel`] themselves.

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

const DEFAULT_MIN_EFFICIENCY: f64 = 0.9;
const DEFAULT_MAX_EFFICIENCY: f64 = 1.1;

/// Estimates cumulative actual cost for a reported curve point.
pub trait ActualCostModel: std::fmt::Debug {
    /// Actual cost on `date` given the cumulative earned value.
    ///
    /// Called once per reported day, in date order.
    fn actual_cost(&mut self, date: NaiveDate, earned_value: f64) -> f64;
}

/// Deterministic model: AC = EV / cpi.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssumedEfficiency {
    /// Assumed cost performance index. Non-positive values mean 1.0.
    pub cpi: f64,
}

impl AssumedEfficiency {
    /// Creates a model with the given assumed CPI.
    pub fn new(cpi: f64) -> Self {
        Self { cpi }
    }
}

impl Default for AssumedEfficiency {
    fn default() -> Self {
        Self { cpi: 1.0 }
    }
}

impl ActualCostModel for AssumedEfficiency {
    fn actual_cost(&mut self, _date: NaiveDate, earned_value: f64) -> f64 {
        if self.cpi.is_finite() && self.cpi > 0.0 {
            earned_value / self.cpi
        } else {
            earned_value
        }
    }
}

/// Randomized model: AC = EV / e with e drawn uniformly from `[min, max)`
/// for each reported day.
///
/// Seeded, so a given seed always yields the same curve.
#[derive(Debug, Clone)]
pub struct SimulatedVariance {
    rng: SmallRng,
    min: f64,
    max: f64,
}

impl SimulatedVariance {
    /// Creates a seeded model drawing efficiencies from `[min, max)`.
    ///
    /// Bounds are swapped if reversed. Bounds that are not finite and
    /// positive, or whose width is not finite, fall back to `[0.9, 1.1)`.
    pub fn new(seed: u64, min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let usable = min.is_finite() && max.is_finite() && min > 0.0 && (max - min).is_finite();
        let (min, max) = if usable {
            (min, max)
        } else {
            warn!(min, max, "unusable efficiency bounds, using defaults");
            (DEFAULT_MIN_EFFICIENCY, DEFAULT_MAX_EFFICIENCY)
        };
        Self {
            rng: SmallRng::seed_from_u64(seed),
            min,
            max,
        }
    }

    fn draw_efficiency(&mut self) -> f64 {
        if self.min < self.max {
            self.rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

impl Default for SimulatedVariance {
    fn default() -> Self {
        Self::new(42, DEFAULT_MIN_EFFICIENCY, DEFAULT_MAX_EFFICIENCY)
    }
}

impl ActualCostModel for SimulatedVariance {
    fn actual_cost(&mut self, _date: NaiveDate, earned_value: f64) -> f64 {
        let efficiency = self.draw_efficiency();
        if efficiency.is_finite() && efficiency > 0.0 {
            earned_value / efficiency
        } else {
            earned_value
        }
    }
}
