//! Engine error types.
//!
//! Two failure families exist: malformed input that normalization could
//! not repair, and precedence graphs that are not acyclic. An empty
//! schedule is not an error.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised by the scheduling engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Input activities failed structural validation.
    #[error("schedule validation failed: {0}")]
    Validation(ValidationErrors),

    /// The precedence graph contains a cycle.
    #[error("dependency cycle detected: {}", .ids.join(" -> "))]
    CycleDetected {
        /// Activity ids along the cycle, first id repeated at the end.
        ids: Vec<String>,
    },
}

impl ScheduleError {
    /// Ids named by the error (offending activities and references).
    pub fn involved_ids(&self) -> Vec<&str> {
        match self {
            Self::Validation(errors) => errors
                .iter()
                .flat_map(|e| std::iter::once(e.activity_id.as_str()).chain(e.reference.as_deref()))
                .collect(),
            Self::CycleDetected { ids } => ids.iter().map(|s| s.as_str()).collect(),
        }
    }
}

/// A non-empty collection of validation errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Iterates over the collected errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(ValidationErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_cycle_message_names_ids() {
        let err = ScheduleError::CycleDetected {
            ids: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle detected: A -> B -> A");
        assert_eq!(err.involved_ids(), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_validation_involved_ids() {
        let err: ScheduleError = vec![ValidationError::new(
            ValidationErrorKind::DanglingDependency,
            "T1",
            Some("T9".into()),
            "Activity 'T1' depends on unknown activity 'T9'",
        )]
        .into();
        assert_eq!(err.involved_ids(), vec!["T1", "T9"]);
        assert!(err.to_string().contains("unknown activity 'T9'"));
    }
}
