//! Input validation for request bodies.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(&'static str),
    /// Value too long.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Number outside its allowed range.
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, actual),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for user and item names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum allowed length for order history descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Longest accepted shelf life for an order item.
pub const MAX_EXPIRED_DAYS: i64 = 36_500;

/// Validate a required text field and return it trimmed.
pub fn validate_text<'a>(
    field: &'static str,
    value: &'a str,
    max: usize,
) -> Result<&'a str, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }

    Ok(value)
}

/// Validate a name (user full name, item name).
pub fn validate_name<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    validate_text(field, value, MAX_NAME_LENGTH)
}

/// Validate that a number lies in `min..=max`.
pub fn validate_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            actual: value,
        });
    }
    Ok(value)
}

/// Validate a referenced entity id.
pub fn validate_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    validate_range(field, value, 1, i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  Alice ").unwrap(), "Alice");

        assert!(matches!(
            validate_name("name", "   "),
            Err(ValidationError::Empty("name"))
        ));

        let long_name = "a".repeat(101);
        assert!(matches!(
            validate_name("name", &long_name),
            Err(ValidationError::TooLong { actual: 101, .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert_eq!(validate_range("price", 5, 1, 10).unwrap(), 5);
        assert!(validate_range("price", 0, 1, 10).is_err());
        assert!(validate_range("price", 11, 1, 10).is_err());
        assert!(validate_id("user_id", 0).is_err());
        assert!(validate_id("user_id", -4).is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::TooLong {
            field: "descriptions",
            max: 255,
            actual: 300,
        };
        assert_eq!(err.to_string(), "descriptions is too long (300 chars, max 255)");

        let err = ValidationError::OutOfRange {
            field: "price",
            min: 1,
            max: 10,
            actual: 0,
        };
        assert_eq!(err.to_string(), "price must be between 1 and 10 (got 0)");
    }
}
