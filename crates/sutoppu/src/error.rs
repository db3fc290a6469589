//! Error types for the sutoppu crate.

use thiserror::Error;

use crate::specification::ErrorMap;

/// Errors produced when a specification is used as a validator.
///
/// A plain `false` from [`is_satisfied_by`](crate::Specification::is_satisfied_by)
/// is not an error; this type only exists for callers that prefer `?` over
/// inspecting the error map by hand (see
/// [`Specification::validate`](crate::Specification::validate)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SpecificationError {
    /// The candidate failed one or more rules.
    #[error("candidate does not satisfy {specification}: {}", summarize(.errors))]
    Unsatisfied {
        /// Class name of the specification that was evaluated.
        specification: String,
        /// Failing rule name → description.
        errors: ErrorMap,
    },
}

impl SpecificationError {
    /// Returns the failing rules, whatever the variant.
    pub fn errors(&self) -> &ErrorMap {
        match self {
            SpecificationError::Unsatisfied { errors, .. } => errors,
        }
    }
}

fn summarize(errors: &ErrorMap) -> String {
    errors
        .iter()
        .map(|(name, description)| format!("{name}: {description}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for sutoppu operations.
pub type Result<T> = std::result::Result<T, SpecificationError>;
