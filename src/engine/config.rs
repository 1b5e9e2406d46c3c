//! Engine and project configuration.
//!
//! All types are `serde` (de)serializable with defaults for every field,
//! so a host can load them from a partial JSON or TOML document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::corrective::CompressionSettings;
use crate::evm::{ActualCostModel, AssumedEfficiency, SimulatedVariance};
use crate::hierarchy::RootMeta;
use crate::models::ReportInterval;

/// Selection of the actual cost estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CostModelConfig {
    /// AC = EV / cpi.
    AssumedEfficiency {
        /// Assumed cost performance index.
        cpi: f64,
    },
    /// AC = EV / e, e drawn from `[min, max)` by a seeded generator.
    SimulatedVariance {
        /// Generator seed.
        seed: u64,
        /// Lowest efficiency.
        min: f64,
        /// Highest efficiency (exclusive).
        max: f64,
    },
}

impl CostModelConfig {
    /// Instantiates the configured model.
    pub fn build(&self) -> Box<dyn ActualCostModel> {
        match *self {
            Self::AssumedEfficiency { cpi } => Box::new(AssumedEfficiency::new(cpi)),
            Self::SimulatedVariance { seed, min, max } => {
                Box::new(SimulatedVariance::new(seed, min, max))
            }
        }
    }
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self::AssumedEfficiency { cpi: 1.0 }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root group metadata and normalization policy.
    pub root: RootMeta,
    /// Corrective action parameters.
    pub compression: CompressionSettings,
    /// Actual cost estimate used by reports.
    pub cost_model: CostModelConfig,
}

impl EngineConfig {
    /// Sets the root metadata.
    pub fn with_root(mut self, root: RootMeta) -> Self {
        self.root = root;
        self
    }

    /// Sets the compression parameters.
    pub fn with_compression(mut self, compression: CompressionSettings) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the actual cost model.
    pub fn with_cost_model(mut self, cost_model: CostModelConfig) -> Self {
        self.cost_model = cost_model;
        self
    }
}

/// Budget and reporting criteria for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectCriteria {
    /// Project title, used for the root name when non-empty.
    pub title: String,
    /// Total budget (BAC).
    pub budget: f64,
    /// Currency code. Display only.
    pub currency: String,
    /// Reporting interval of the curve.
    pub interval: ReportInterval,
    /// Forced project start (root override).
    pub forced_start: Option<NaiveDate>,
    /// Forced project finish (root override and deadline).
    pub forced_finish: Option<NaiveDate>,
}

impl ProjectCriteria {
    /// Creates criteria with a budget.
    pub fn new(budget: f64) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the currency code.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Sets the reporting interval.
    pub fn with_interval(mut self, interval: ReportInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Forces the project start.
    pub fn with_forced_start(mut self, date: NaiveDate) -> Self {
        self.forced_start = Some(date);
        self
    }

    /// Forces the project finish.
    pub fn with_forced_finish(mut self, date: NaiveDate) -> Self {
        self.forced_finish = Some(date);
        self
    }
}
