//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── CoreError        - Misconfiguration, money parsing                │
//! │  └── ValidationError  - A single field's failed check                  │
//! │                                                                         │
//! │  bazaar-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  bazaar-web errors (in app)                                            │
//! │  └── WebError         - Mapped onto HTTP responses                     │
//! │                                                                         │
//! │  ValidationError never leaves the form (inline messages).              │
//! │  CoreError / DbError → WebError → 500 page.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. `ValidationError`'s `Display` IS the message shown next to the field
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core errors.
///
/// `Config` is a programming mistake (e.g. a reference choice source with no
/// columns); the web layer treats it as fatal for the request.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A form or reference source was declared incorrectly.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text could not be read as a price.
    #[error("Invalid money value: {0:?}")]
    InvalidMoney(String),
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CoreError::Config(message.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A failed check on one form field.
///
/// The rendered message is what the user sees under the field, so several
/// variants carry the message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required value is missing or blank.
    #[error("{message}")]
    Required { message: String },

    /// Text length outside `[min, max]` (characters).
    #[error("Input must be between {min} and {max} characters long")]
    Length { min: usize, max: usize },

    /// Text longer than `max` where no minimum applies.
    #[error("Field cannot be longer than {max} characters.")]
    TooLong { max: usize },

    /// Value could not be coerced to the field's type.
    #[error("{message}")]
    Coercion { message: String },

    /// Coerced value is not one of the loaded choices.
    #[error("The chosen option does not exist.")]
    UnknownChoice,

    /// Price below zero.
    #[error("Price must not be negative.")]
    Negative,

    /// File extension not in the allowed set.
    #[error("Images only!")]
    FileNotAllowed,

    /// Cross-reference check failed (child does not belong to parent).
    #[error("{message}")]
    DoesNotBelong { message: String },
}

impl ValidationError {
    /// Creates a Required error with the given message.
    pub fn required(message: impl Into<String>) -> Self {
        ValidationError::Required {
            message: message.into(),
        }
    }

    /// Creates a Coercion error with the given message.
    pub fn coercion(message: impl Into<String>) -> Self {
        ValidationError::Coercion {
            message: message.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_message() {
        let err = ValidationError::Length { min: 5, max: 20 };
        assert_eq!(
            err.to_string(),
            "Input must be between 5 and 20 characters long"
        );
    }

    #[test]
    fn test_verbatim_messages() {
        assert_eq!(
            ValidationError::required("Input is required!").to_string(),
            "Input is required!"
        );
        assert_eq!(
            ValidationError::DoesNotBelong {
                message: "Subcategory does not belong to that category.".to_string()
            }
            .to_string(),
            "Subcategory does not belong to that category."
        );
        assert_eq!(ValidationError::FileNotAllowed.to_string(), "Images only!");
    }
}
