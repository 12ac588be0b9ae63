use std::fmt;

use crate::bank::operation::OperationRecord;

/// Top-level error type for the bank account crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors during `OperationRecord` -> `Operation` conversion (hard errors).
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(OperationRecord),
}

/// Which format rule a value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatViolation {
    Empty,
    Pattern,
    Length { max: usize },
}

/// Validation failures raised by `TimeZone`, `Account` and the confirmation
/// code parser. Always returned to the immediate caller.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("The {field} parameter is missing. You must insert {field} parameter.")]
    MissingArgument { field: &'static str },

    #[error("Wrong input type for {field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("{field} must be an integer, got {found:?}")]
    InvalidType { field: &'static str, found: String },

    #[error("{}", format_violation_message(.field, .violation))]
    InvalidFormat {
        field: &'static str,
        violation: FormatViolation,
    },

    #[error("{field} must be within {bounds}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        bounds: &'static str,
    },

    #[error("Malformed input {input:?}: {reason}")]
    MalformedInput {
        input: String,
        reason: &'static str,
        #[source]
        source: Option<chrono::ParseError>,
    },
}

impl ValidationError {
    pub(crate) fn out_of_range(
        field: &'static str,
        value: impl fmt::Display,
        bounds: &'static str,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            bounds,
        }
    }

    pub(crate) fn malformed(input: &str, reason: &'static str) -> Self {
        Self::MalformedInput {
            input: input.to_owned(),
            reason,
            source: None,
        }
    }
}

fn format_violation_message(field: &str, violation: &FormatViolation) -> String {
    match violation {
        FormatViolation::Empty => format!("{field} cannot be empty."),
        FormatViolation::Pattern => format!(
            "The {field} parameter must only be alphabet characters and no spaces allowed."
        ),
        FormatViolation::Length { max } => {
            format!("The {field} cannot be more than {max} characters.")
        }
    }
}
