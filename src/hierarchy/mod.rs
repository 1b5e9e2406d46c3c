//! Work breakdown hierarchy: normalization and presentation order.
//!
//! [`normalize`] is the sanitization boundary between loosely structured
//! input and the engine. It repairs what it can (synthesizes the root,
//! reparents orphans, fills dates, renames duplicate ids) and fails only
//! on references it cannot resolve.
//!
//! [`flatten`] orders a snapshot for presentation: parent before child,
//! each node annotated with its depth.
//!
//! # Usage
//!
//! ```
//! use u_project::hierarchy::{normalize, RootMeta};
//! use u_project::models::RawActivity;
//!
//! let raw = vec![
//!     RawActivity::new("1").with_kind("task").with_dates("2026-01-01", "2026-01-05"),
//!     RawActivity::new("2").with_kind("task").with_dates("2026-01-05", "2026-01-09")
//!         .with_dependency("1"),
//! ];
//! let snapshot = normalize(&raw, &RootMeta::default()).unwrap();
//! assert_eq!(snapshot.len(), 3); // synthesized root + 2 tasks
//! assert_eq!(snapshot.activities[0].id, "ROOT-SUMMARY");
//! ```

mod flatten;
mod normalize;

pub use flatten::{apply_root_constraints, flatten};
pub use normalize::{normalize, normalize_with};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default id of the synthetic root group.
pub const DEFAULT_ROOT_ID: &str = "ROOT-SUMMARY";

/// What to do with dependencies that reference unknown activities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPolicy {
    /// Fail normalization, naming each activity and missing reference.
    #[default]
    Reject,
    /// Drop the dangling edge and continue.
    Drop,
}

/// Metadata for the root group and normalization behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMeta {
    /// Id of the root group.
    pub id: String,
    /// Display name of a synthesized root.
    pub name: String,
    /// Resource label of a synthesized root.
    pub resource_label: String,
    /// Date used when no input date parses.
    pub fallback_start: Option<NaiveDate>,
    /// Handling of unresolvable dependency ids.
    pub dangling_policy: DanglingPolicy,
}

impl RootMeta {
    /// Creates root metadata with the given root id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the root display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Uses a project title for the root name (`Project Summary: <title>`).
    pub fn with_title(mut self, title: &str) -> Self {
        self.name = format!("Project Summary: {title}");
        self
    }

    /// Sets the root resource label.
    pub fn with_resource(mut self, label: impl Into<String>) -> Self {
        self.resource_label = label.into();
        self
    }

    /// Sets the fallback date.
    pub fn with_fallback_start(mut self, date: NaiveDate) -> Self {
        self.fallback_start = Some(date);
        self
    }

    /// Sets the dangling-dependency policy.
    pub fn with_dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.dangling_policy = policy;
        self
    }
}

impl Default for RootMeta {
    fn default() -> Self {
        Self {
            id: DEFAULT_ROOT_ID.to_string(),
            name: "Project Summary: Overall Project".to_string(),
            resource_label: "Project Management".to_string(),
            fallback_start: None,
            dangling_policy: DanglingPolicy::Reject,
        }
    }
}
