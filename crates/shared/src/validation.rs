//! Common validation utilities.

use validator::ValidationError;

/// Validates that a string is non-empty after trimming whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a quantity is strictly positive.
pub fn validate_positive_quantity(qty: i32) -> Result<(), ValidationError> {
    if qty > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_positive");
        err.message = Some("Quantity must be greater than zero".into());
        Err(err)
    }
}

/// Validates that a quantity is non-negative (stock counters).
pub fn validate_non_negative_quantity(qty: i32) -> Result<(), ValidationError> {
    if qty >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_non_negative");
        err.message = Some("Quantity must not be negative".into());
        Err(err)
    }
}

/// Validates an employee role value.
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "admin" | "employee" => Ok(()),
        _ => {
            let mut err = ValidationError::new("role");
            err.message = Some("Role must be 'admin' or 'employee'".into());
            Err(err)
        }
    }
}

/// Validates a request type value (case-insensitive, as submitted by forms).
pub fn validate_request_type(value: &str) -> Result<(), ValidationError> {
    match value.trim().to_lowercase().as_str() {
        "new" | "exchange" => Ok(()),
        _ => {
            let mut err = ValidationError::new("request_type");
            err.message = Some("requestType must be 'new' or 'exchange'".into());
            Err(err)
        }
    }
}

/// Validates an employee age, when provided.
pub fn validate_age(age: i32) -> Result<(), ValidationError> {
    if (16..=100).contains(&age) {
        Ok(())
    } else {
        let mut err = ValidationError::new("age_range");
        err.message = Some("Age must be between 16 and 100".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("desk 12").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_positive_quantity() {
        assert!(validate_positive_quantity(1).is_ok());
        assert!(validate_positive_quantity(0).is_err());
        assert!(validate_positive_quantity(-3).is_err());
    }

    #[test]
    fn test_non_negative_quantity() {
        assert!(validate_non_negative_quantity(0).is_ok());
        assert!(validate_non_negative_quantity(-1).is_err());
    }

    #[test]
    fn test_role_values() {
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("employee").is_ok());
        assert!(validate_role("superuser").is_err());
        assert!(validate_role("Admin").is_err());
    }

    #[test]
    fn test_request_type_case_insensitive() {
        assert!(validate_request_type("new").is_ok());
        assert!(validate_request_type("Exchange").is_ok());
        assert!(validate_request_type(" NEW ").is_ok());
        assert!(validate_request_type("loan").is_err());
    }

    #[test]
    fn test_age_range() {
        assert!(validate_age(30).is_ok());
        assert!(validate_age(15).is_err());
        assert!(validate_age(101).is_err());
    }
}
