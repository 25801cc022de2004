//! Error types for the hotel back office engine.
//!
//! Every service operation returns [`HotelError`]. The variants follow the
//! taxonomy the API exposes: validation failures, state conflicts, missing
//! resources, business-rule violations and internal failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field, or `"__all__"` for cross-field checks.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The main error type for the hotel engine.
///
/// # Example
///
/// ```
/// use hotel_engine::error::HotelError;
///
/// let error = HotelError::NotFound {
///     entity: "booking",
///     id: "42".to_string(),
/// };
/// assert_eq!(error.to_string(), "booking not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum HotelError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Input was malformed or missing required fields.
    #[error("Validation failed: {}", summarize(.errors))]
    Validation {
        /// Per-field failures.
        errors: Vec<FieldError>,
    },

    /// The operation is not permitted in the entity's current state.
    #[error("Cannot {action} {entity} in state '{state}'")]
    StateConflict {
        /// The kind of entity, e.g. `"booking"`.
        entity: &'static str,
        /// The attempted action, e.g. `"check in"`.
        action: &'static str,
        /// The entity's current state.
        state: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A capacity, overlap or threshold rule was breached.
    #[error("{message}")]
    BusinessRule {
        /// Human-readable reason.
        message: String,
        /// Structured context, e.g. conflicting room ids.
        details: Option<serde_json::Value>,
    },

    /// A signed payload failed verification.
    #[error("Invalid signature")]
    InvalidSignature,

    /// An unexpected failure.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the failure (logged, never sent to callers).
        message: String,
    },
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl HotelError {
    /// Shorthand for a validation error on a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        HotelError::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Shorthand for a business-rule violation without details.
    pub fn rule(message: impl Into<String>) -> Self {
        HotelError::BusinessRule {
            message: message.into(),
            details: None,
        }
    }

    /// Shorthand for a business-rule violation carrying structured details.
    pub fn rule_with(message: impl Into<String>, details: serde_json::Value) -> Self {
        HotelError::BusinessRule {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        HotelError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for failures caused by the server rather than the request.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            HotelError::ConfigNotFound { .. }
                | HotelError::ConfigParseError { .. }
                | HotelError::Internal { .. }
        )
    }
}

impl From<validator::ValidationErrors> for HotelError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut collected = Vec::new();
        flatten_validation("", &errors, &mut collected);
        collected.sort_by(|a, b| a.field.cmp(&b.field));
        HotelError::Validation { errors: collected }
    }
}

/// Walks nested struct and list errors, naming fields like `services[0].quantity`.
fn flatten_validation(prefix: &str, errors: &validator::ValidationErrors, out: &mut Vec<FieldError>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed check '{}'", e.code));
                    FieldError::new(path.clone(), message)
                }));
            }
            ValidationErrorsKind::Struct(nested) => flatten_validation(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_validation(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// A type alias for Results that return HotelError.
pub type HotelResult<T> = Result<T, HotelError>;
