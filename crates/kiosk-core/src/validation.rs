//! # Validation Module
//!
//! Input validation for the forms in front of the database.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE                                                  │
//! │  ├── Empty / too long names                                            │
//! │  └── Quantity, price and stock ranges                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE usernames and supplier names                               │
//! │  └── Foreign keys (supplier, product, cashier, sale)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Usernames: 1-50 characters, no surrounding whitespace counted.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_name("username", username, 50)
}

/// Passwords only need to be present.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    validate_name("supplier name", name, 100)
}

/// Product names: 1-200 characters.
///
/// ```rust
/// use kiosk_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Alfajor triple").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("product name", name, 200)
}

/// Validates a quantity sold in one cart line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Stock levels entered on the stock and product forms can be zero.
pub fn validate_stock(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Prices can be zero (free items) but not negative, and are capped at
/// MAX_UNIT_PRICE_CENTS.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    if cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Report sizes: 1-500 rows.
pub fn validate_report_limit(limit: u32) -> ValidationResult<()> {
    if limit == 0 || limit > 500 {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: 500,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_username("kiosco").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());

        assert!(validate_supplier_name("Distribuidora Sur").is_ok());
        assert!(validate_supplier_name("  ").is_err());

        assert!(validate_product_name("Coca-Cola 500ml").is_ok());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("1234").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_stock_and_price() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-100).is_err());
        assert!(validate_price_cents(MAX_UNIT_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(i64::MAX / 2),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_report_limit() {
        assert!(validate_report_limit(20).is_ok());
        assert!(validate_report_limit(0).is_err());
        assert!(validate_report_limit(501).is_err());
    }
}
