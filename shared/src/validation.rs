//! Validation utilities for the Stock Ledger
//!
//! Field rules mirror the column constraints of the schema so that a bad
//! form is rejected with a message before the database gets to say no.

use rust_decimal::Decimal;

use crate::models::PRODUCT_IMAGE_DIR;

/// Maximum length of names (category, product, counterparty, company)
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a phone number as entered
pub const MAX_PHONE_LENGTH: usize = 32;

/// Maximum length of a stored image path
pub const MAX_IMAGE_PATH_LENGTH: usize = 100;

// ============================================================================
// Ledger Validations
// ============================================================================

/// Validate an operation quantity (whole units, at least one)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 1 {
        return Err("Quantity must be at least 1");
    }
    Ok(())
}

/// Validate a unit price (non-negative, at most two decimals)
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    if price.normalize().scale() > 2 {
        return Err("Price must have at most 2 decimal places");
    }
    if price >= Decimal::from(10_000_000_000i64) {
        return Err("Price is too large");
    }
    Ok(())
}

/// Validate a discount percentage (0 to 100, at most two decimals)
pub fn validate_discount(discount: Decimal) -> Result<(), &'static str> {
    if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
        return Err("Discount must be between 0 and 100 percent");
    }
    if discount.normalize().scale() > 2 {
        return Err("Discount must have at most 2 decimal places");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a required name: not blank, at most 200 characters
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    if name.trim().chars().count() > MAX_NAME_LENGTH {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

/// Validate an optional company name: length only, blank clears it
pub fn validate_company_name(company_name: &str) -> Result<(), &'static str> {
    if company_name.trim().chars().count() > MAX_NAME_LENGTH {
        return Err("Company name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a phone number: digits with optional `+`, spaces, dashes, parentheses
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if phone.chars().count() > MAX_PHONE_LENGTH {
        return Err("Phone number is too long");
    }
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
    {
        return Err("Phone number may contain only digits, spaces, '+', '-' and parentheses");
    }
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !(5..=15).contains(&digits) {
        return Err("Phone number must contain between 5 and 15 digits");
    }
    Ok(())
}

/// Validate a stored product image path.
///
/// Images are referenced, never uploaded here: the path must sit under
/// `products/` and may not climb out of the media root.
pub fn validate_image_path(path: &str) -> Result<(), &'static str> {
    if !path.starts_with(PRODUCT_IMAGE_DIR) || path.len() == PRODUCT_IMAGE_DIR.len() {
        return Err("Image path must point into products/");
    }
    if path.len() > MAX_IMAGE_PATH_LENGTH {
        return Err("Image path must be at most 100 characters");
    }
    if path.split('/').any(|segment| segment == "..") || path.contains('\\') {
        return Err("Image path may not leave the media directory");
    }
    Ok(())
}

/// Validate an administrator username
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 || username.len() > 150 {
        return Err("Username must be between 3 and 150 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
    {
        return Err("Username may contain only letters, digits and @/./+/-/_");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ========================================================================
    // Ledger Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-4).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(dec("0")).is_ok());
        assert!(validate_price(dec("12.50")).is_ok());
        assert!(validate_price(dec("12.500")).is_ok()); // trailing zero only
        assert!(validate_price(dec("12.505")).is_err());
        assert!(validate_price(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(Decimal::ZERO).is_ok());
        assert!(validate_discount(dec("12.5")).is_ok());
        assert!(validate_discount(Decimal::ONE_HUNDRED).is_ok());
        assert!(validate_discount(dec("100.01")).is_err());
        assert!(validate_discount(dec("-0.5")).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Чайники").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"я".repeat(200)).is_ok());
        assert!(validate_name(&"я".repeat(201)).is_err());
        assert!(validate_name(&format!("  {}  ", "я".repeat(200))).is_ok());
    }

    #[test]
    fn test_validate_company_name() {
        assert!(validate_company_name("").is_ok());
        assert!(validate_company_name("ООО Ромашка").is_ok());
        assert!(validate_company_name(&"x".repeat(200)).is_ok());
        assert!(validate_company_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+7 (912) 345-67-89").is_ok());
        assert!(validate_phone("89123456789").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_image_path() {
        assert!(validate_image_path("products/kettle.jpg").is_ok());
        assert!(validate_image_path("products/").is_err());
        assert!(validate_image_path("avatars/me.png").is_err());
        assert!(validate_image_path("products/../secrets.env").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("ops.lead@store").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }
}
