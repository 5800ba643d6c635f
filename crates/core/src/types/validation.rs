//! Field-level validation errors shared by admin forms.

use thiserror::Error;

/// A rejected form field.
///
/// The backend re-validates everything; these errors only exist so a form
/// can refuse to submit obviously invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("{field} is required")]
    Required {
        /// Field name.
        field: &'static str,
    },
    /// A field is present but malformed.
    #[error("{field} is invalid: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// A text field is shorter than allowed.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Field name.
        field: &'static str,
        /// Minimum length.
        min: usize,
    },
    /// A numeric field is outside its allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Inclusive lower bound.
        min: String,
        /// Inclusive upper bound.
        max: String,
    },
    /// Commission percentages do not add up to the pool size.
    #[error("commission percentages must sum to {expected} (currently {actual})")]
    CommissionTotal {
        /// Required total.
        expected: String,
        /// Actual total.
        actual: String,
    },
    /// A secret looks like a placeholder or is too weak.
    #[error("{field} {reason}")]
    WeakSecret {
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
