//! Project scheduling domain models.
//!
//! Provides the data types shared by every engine stage: the activity
//! node, the snapshot that holds them, the loose input record, resource
//! categories, calendar helpers, and curve points.
//!
//! # Domain Mappings
//!
//! | u-project | Construction | Software | Events |
//! |-----------|--------------|----------|--------|
//! | Group | Phase | Epic | Workstream |
//! | Task | Work package | Story | Booking |
//! | Milestone | Handover | Release | Launch day |
//! | Dependency | Cure before load | Blocked by | Venue before catering |

mod activity;
pub mod calendar;
mod raw;
mod resource;
mod series;
mod snapshot;

pub use activity::{Activity, ActivityKind, CorrectiveAction, CpmData};
pub use calendar::{DateSpan, ReportInterval};
pub use raw::{RawActivity, RawId};
pub use resource::{ResourceBreakdown, ResourceCategory};
pub use series::TimeSeriesPoint;
pub use snapshot::ScheduleSnapshot;
