//! Shared field checks for `validator` derives.

use rust_decimal::Decimal;
use validator::{Validate, ValidationError};

use crate::error::HotelResult;

/// Money amounts and rates must not be negative.
pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("must not be negative".into());
        Err(err)
    }
}

/// Strictly positive amounts.
pub fn positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("must be greater than 0".into());
        Err(err)
    }
}

/// Rejects strings that are empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Runs the derived checks and converts failures to [`crate::error::HotelError`].
pub fn check<T: Validate>(input: &T) -> HotelResult<()> {
    input.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert!(non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(non_negative_decimal(&Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(positive_decimal(&Decimal::ZERO).is_err());
        assert!(positive_decimal(&Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank("101").is_ok());
    }
}
