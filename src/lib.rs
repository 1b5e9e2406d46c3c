//! Project scheduling engine.
//!
//! Turns a loosely structured activity list into a single-rooted work
//! breakdown, derives group values bottom-up, computes the critical path,
//! compresses the schedule on request, and reports earned value curves.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Activity`, `ScheduleSnapshot`,
//!   `RawActivity`, `TimeSeriesPoint`, `ResourceBreakdown`, calendar helpers
//! - **`validation`**: Structural checks (tree invariant, dependency references, date ranges)
//! - **`hierarchy`**: Normalization of raw input, presentation order, root overrides
//! - **`rollup`**: Bottom-up cost, progress, and date aggregation
//! - **`cpm`**: Critical path method with cycle detection
//! - **`corrective`**: Crashing and fast-tracking
//! - **`evm`**: S-curves, actual cost models, earned value indicators
//! - **`engine`**: The end-to-end pipeline and its configuration
//!
//! # Architecture
//!
//! Every stage is a pure function from a borrowed snapshot to a new one.
//! Nothing is cached between calls: after any edit the whole snapshot is
//! rolled up and rescheduled again. The engine never reads the clock; the
//! status date of a report is always supplied by the caller.
//!
//! Logging goes through `tracing`. The crate installs no subscriber.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - PMI (2021), "A Guide to the Project Management Body of Knowledge", 7th ed.
//! - Fleming & Koppelman (2010), "Earned Value Project Management"

pub mod corrective;
pub mod cpm;
pub mod engine;
pub mod error;
pub mod evm;
mod graph;
pub mod hierarchy;
pub mod models;
pub mod rollup;
pub mod validation;

pub use engine::{EngineConfig, ProgressReport, ProjectCriteria, ScheduleEngine};
pub use error::{Result, ScheduleError};
