//! Loosely structured activity input.
//!
//! Proposed activities arrive from an external content generator and may
//! omit fields, use numbers for ids, or point at parents that don't
//! exist. [`RawActivity`] accepts all of that; the hierarchy normalizer is
//! the only place that turns it into an [`Activity`](super::Activity).

use serde::{Deserialize, Serialize};

/// An identifier that may be given as text or as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Textual id.
    Text(String),
    /// Integral id.
    Integer(i64),
    /// Decimal id, e.g. `1.2` for a WBS code.
    Decimal(f64),
}

impl RawId {
    /// Canonical string form. Numbers use their shortest decimal form.
    pub fn canonical(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Decimal(x) => x.to_string(),
        }
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for RawId {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// A proposed activity with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawActivity {
    /// Identifier.
    pub id: Option<RawId>,
    /// Display name.
    pub name: Option<String>,
    /// Kind label: `project`/`group`/`phase`/`summary`, `task`, `milestone`.
    #[serde(alias = "type")]
    pub kind: Option<String>,
    /// Start date string.
    pub start: Option<String>,
    /// End date string.
    pub end: Option<String>,
    /// Percent complete.
    pub progress: Option<f64>,
    /// Parent id.
    #[serde(alias = "project", alias = "parentId")]
    pub parent: Option<RawId>,
    /// Cost.
    pub cost: Option<f64>,
    /// Resource tag.
    #[serde(alias = "resourceLabel")]
    pub resource: Option<String>,
    /// Predecessor ids.
    pub dependencies: Option<Vec<RawId>>,
}

impl RawActivity {
    /// Creates a raw activity with an id.
    pub fn new(id: impl Into<RawId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the kind label.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets start and end date strings.
    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    /// Sets progress.
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the parent reference.
    pub fn with_parent(mut self, parent: impl Into<RawId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the cost.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Sets the resource tag.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Adds a predecessor reference.
    pub fn with_dependency(mut self, dep: impl Into<RawId>) -> Self {
        self.dependencies.get_or_insert_with(Vec::new).push(dep.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_id_canonical() {
        assert_eq!(RawId::from(" 1.1 ").canonical(), "1.1");
        assert_eq!(RawId::Integer(7).canonical(), "7");
        assert_eq!(RawId::Decimal(1.5).canonical(), "1.5");
        assert_eq!(RawId::Decimal(2.0).canonical(), "2");
    }

    #[test]
    fn test_deserialize_generator_payload() {
        let json = r#"{
            "id": 3,
            "name": "Foundations",
            "type": "project",
            "start": "2026-02-01",
            "end": "2026-02-20",
            "progress": 12.5,
            "project": "ROOT-SUMMARY",
            "cost": 0,
            "resource": "Crew B (Labor)",
            "dependencies": ["1", 2]
        }"#;
        let raw: RawActivity = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, Some(RawId::Integer(3)));
        assert_eq!(raw.kind.as_deref(), Some("project"));
        assert_eq!(raw.parent, Some(RawId::from("ROOT-SUMMARY")));
        assert_eq!(raw.progress, Some(12.5));
        let deps: Vec<String> = raw
            .dependencies
            .unwrap()
            .iter()
            .map(RawId::canonical)
            .collect();
        assert_eq!(deps, vec!["1", "2"]);
    }

    #[test]
    fn test_deserialize_sparse_payload() {
        let raw: RawActivity = serde_json::from_str(r#"{"name": "Orphan"}"#).unwrap();
        assert!(raw.id.is_none());
        assert!(raw.start.is_none());
        assert!(raw.dependencies.is_none());
        assert_eq!(raw.name.as_deref(), Some("Orphan"));
    }

    #[test]
    fn test_builder() {
        let raw = RawActivity::new("T1")
            .with_kind("task")
            .with_dates("2026-01-01", "2026-01-05")
            .with_dependency("T0")
            .with_dependency(4);
        assert_eq!(raw.dependencies.as_ref().map(Vec::len), Some(2));
    }
}
