//! Earned value management: S-curves and performance indicators.
//!
//! The daily curve is computed over the project window of the given leaf
//! activities, then optionally bucketed by week, month, or quarter.
//!
//! # Planned and actual shares
//!
//! - Planned share of an activity on day `d`: 0 before its start, 1 from
//!   its end, otherwise `(d − start + 1) / days`.
//! - Actual share up to the status date: the reported progress spread
//!   linearly over the days elapsed so far, clamped to the reported value.
//!
//! Both are averaged with equal weight per activity. Group rollup weights
//! by cost, so the two percentages can differ for the same snapshot.
//!
//! # Actual cost
//!
//! There is no actuals feed. [`ActualCostModel`] estimates AC from EV;
//! see [`AssumedEfficiency`] and [`SimulatedVariance`].
//!
//! # Reference
//! ANSI/EIA-748 (2019), "Earned Value Management Systems"

mod aggregate;
mod cost_model;
mod curve;
mod summary;

pub use aggregate::aggregate;
pub use cost_model::{ActualCostModel, AssumedEfficiency, SimulatedVariance};
pub use curve::{build_curve, SCurveBuilder};
pub use summary::EvmSummary;
