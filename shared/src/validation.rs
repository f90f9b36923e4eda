//! Validation utilities for catalog and stocktake input

use crate::types::{Quantity, MAX_QUANTITY, QUANTITY_SCALE};

/// Longest accepted drink, location or user name
pub const MAX_NAME_LEN: usize = 120;

/// Largest nominal container size accepted (20 litres)
pub const MAX_VOLUME_ML: i32 = 20_000;

/// Validate a counted quantity: non-negative, bounded, limited precision
pub fn validate_quantity(quantity: Quantity) -> Result<(), &'static str> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err("Quantity cannot be negative");
    }
    if quantity > MAX_QUANTITY {
        return Err("Quantity must be at most 999999999.999");
    }
    if quantity.normalize().scale() > QUANTITY_SCALE {
        return Err("Quantity supports at most 3 decimal places");
    }
    Ok(())
}

/// Validate a display name after trimming
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err("Name must be at most 120 characters");
    }
    Ok(())
}

/// Validate a drink's nominal volume
pub fn validate_volume(volume_ml: i32) -> Result<(), &'static str> {
    if volume_ml <= 0 {
        return Err("Volume must be positive");
    }
    if volume_ml > MAX_VOLUME_ML {
        return Err("Volume must be at most 20000 ml");
    }
    Ok(())
}

/// Collapse inner whitespace and trim, the form names are stored in
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_quantity_accepts_counts() {
        assert!(validate_quantity(Decimal::ZERO).is_ok());
        assert!(validate_quantity(dec("12")).is_ok());
        assert!(validate_quantity(dec("0.75")).is_ok());
        assert!(validate_quantity(dec("3.500")).is_ok());
    }

    #[test]
    fn test_validate_quantity_rejects_negative() {
        assert!(validate_quantity(dec("-1")).is_err());
        assert!(validate_quantity(dec("-0.001")).is_err());
    }

    #[test]
    fn test_validate_quantity_negative_zero_is_zero() {
        assert!(validate_quantity(dec("-0.000")).is_ok());
    }

    #[test]
    fn test_validate_quantity_rejects_precision() {
        assert!(validate_quantity(dec("1.2345")).is_err());
        // trailing zeros do not count against precision
        assert!(validate_quantity(dec("1.2000000")).is_ok());
    }

    #[test]
    fn test_validate_quantity_rejects_values_storage_cannot_hold() {
        assert!(validate_quantity(dec("999999999.999")).is_ok());
        assert_eq!(
            validate_quantity(dec("1000000000")),
            Err("Quantity must be at most 999999999.999")
        );
        assert!(validate_quantity(Decimal::from(10_000_000_000i64)).is_err());
        assert!(validate_quantity(Decimal::MAX).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Gin").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_volume() {
        assert!(validate_volume(700).is_ok());
        assert!(validate_volume(0).is_err());
        assert!(validate_volume(-330).is_err());
        assert!(validate_volume(20_001).is_err());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  London   Dry  Gin "), "London Dry Gin");
        assert_eq!(normalize_name("Gin"), "Gin");
    }
}
