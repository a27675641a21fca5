//! # Validation Module
//!
//! Single-field validators. Forms in [`crate::form`] chain these per field.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Coercion (this module: coerce_*)                             │
//! │  ├── Raw text → i64 / Money                                            │
//! │  └── Failure stops the field's chain                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Field validators (this module: validate_*)                   │
//! │  ├── Required, length, sign, allowed extension, known choice           │
//! │  └── First failure stops the field's chain                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cross-reference (bazaar-db)                                  │
//! │  └── Subcategory belongs to category (COUNT query)                     │
//! │                                                                         │
//! │  Independent fields are always all checked.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::{validate_length, coerce_int};
//!
//! assert!(validate_length("Vintage Lamp", 5, 20).is_ok());
//! assert!(validate_length("Lamp", 5, 20).is_err());
//! assert_eq!(coerce_int("42").unwrap(), 42);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::reference::Choices;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Extensions accepted for item images.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

// =============================================================================
// Coercion
// =============================================================================

/// Coerces select-field text to an integer.
///
/// Surrounding whitespace is ignored. Empty text is a coercion failure; the
/// caller decides beforehand whether an absent value is acceptable.
pub fn coerce_int(raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::coercion("Not a valid choice."))
}

/// Coerces price text to [`Money`].
pub fn coerce_price(raw: &str) -> ValidationResult<Money> {
    Money::parse_decimal(raw).map_err(|_| ValidationError::coercion("Not a valid decimal value."))
}

// =============================================================================
// String Validators
// =============================================================================

/// Checks that text is present and not blank.
///
/// Returns the text untouched (not trimmed) on success.
pub fn validate_required<'a>(value: Option<&'a str>, message: &str) -> ValidationResult<&'a str> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::required(message)),
    }
}

/// Checks that text length (in characters) lies within `[min, max]`.
pub fn validate_length(value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::Length { min, max });
    }
    Ok(())
}

/// Checks an upper bound only. Empty text passes.
pub fn validate_max_length(value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { max });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price.
///
/// ## Rules
/// - Zero is allowed (free items)
/// - Negative prices are rejected
///
/// ## Example
/// ```rust
/// use bazaar_core::money::Money;
/// use bazaar_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1250)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative);
    }
    Ok(())
}

// =============================================================================
// Choice and File Validators
// =============================================================================

/// Checks that a coerced select value is one of the loaded choices.
pub fn validate_choice(value: i64, choices: &Choices) -> ValidationResult<()> {
    if !choices.contains(value) {
        return Err(ValidationError::UnknownChoice);
    }
    Ok(())
}

/// Checks an uploaded filename's extension against [`ALLOWED_IMAGE_EXTENSIONS`].
///
/// Comparison is case-insensitive; a name without an extension fails.
pub fn validate_image_filename(filename: &str) -> ValidationResult<()> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::FileNotAllowed),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
