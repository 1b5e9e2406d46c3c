//! Resource breakdown structure (RBS).
//!
//! Activities carry a free-text resource tag such as `"Crane (Equipment)"`.
//! The category is read informally from the tag: a parenthesised suffix
//! wins, otherwise keywords anywhere in the label are matched. There is no
//! enforced taxonomy.

use serde::{Deserialize, Serialize};

use super::Activity;

/// Resource category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    /// Crews, trades, staff.
    Labor,
    /// Consumed goods (concrete, steel).
    Material,
    /// Machines and tools.
    Equipment,
    /// Anything not recognised.
    Other,
}

impl ResourceCategory {
    /// All categories in report order.
    pub const ALL: [ResourceCategory; 4] = [
        ResourceCategory::Labor,
        ResourceCategory::Material,
        ResourceCategory::Equipment,
        ResourceCategory::Other,
    ];

    /// Classifies a resource label.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        if let (Some(open), Some(close)) = (lower.rfind('('), lower.rfind(')')) {
            if open < close {
                if let Some(category) = Self::from_keyword(&lower[open + 1..close]) {
                    return category;
                }
            }
        }
        Self::from_keyword(&lower).unwrap_or(Self::Other)
    }

    fn from_keyword(text: &str) -> Option<Self> {
        if text.contains("labor") || text.contains("labour") || text.contains("crew") {
            Some(Self::Labor)
        } else if text.contains("material") {
            Some(Self::Material)
        } else if text.contains("equipment") {
            Some(Self::Equipment)
        } else {
            None
        }
    }

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Labor => "Labor",
            Self::Material => "Material",
            Self::Equipment => "Equipment",
            Self::Other => "Other",
        }
    }
}

/// Cost totals per resource category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceBreakdown {
    /// Labor cost.
    pub labor: f64,
    /// Material cost.
    pub material: f64,
    /// Equipment cost.
    pub equipment: f64,
    /// Unclassified cost.
    pub other: f64,
}

impl ResourceBreakdown {
    /// Sums the cost of the given activities by category.
    ///
    /// Group nodes are skipped so rolled-up costs are not counted twice.
    pub fn from_activities<'a>(activities: impl IntoIterator<Item = &'a Activity>) -> Self {
        let mut breakdown = Self::default();
        for act in activities.into_iter().filter(|a| !a.is_group()) {
            *breakdown.slot_mut(act.resource_category()) += act.cost;
        }
        breakdown
    }

    /// Cost for one category.
    pub fn get(&self, category: ResourceCategory) -> f64 {
        match category {
            ResourceCategory::Labor => self.labor,
            ResourceCategory::Material => self.material,
            ResourceCategory::Equipment => self.equipment,
            ResourceCategory::Other => self.other,
        }
    }

    fn slot_mut(&mut self, category: ResourceCategory) -> &mut f64 {
        match category {
            ResourceCategory::Labor => &mut self.labor,
            ResourceCategory::Material => &mut self.material,
            ResourceCategory::Equipment => &mut self.equipment,
            ResourceCategory::Other => &mut self.other,
        }
    }

    /// Total across categories.
    pub fn total(&self) -> f64 {
        ResourceCategory::ALL.iter().map(|&c| self.get(c)).sum()
    }

    /// Share of the total for a category (0.0..1.0). Zero when there is no cost.
    pub fn share(&self, category: ResourceCategory) -> f64 {
        let total = self.total();
        if total > 0.0 {
            self.get(category) / total
        } else {
            0.0
        }
    }
}
