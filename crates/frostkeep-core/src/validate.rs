//! Local form validation, applied before anything is sent to the backend.

use std::fmt;

use crate::api::types::{Category, Credentials};

/// Bounds for the expiry-warning window, mirrored from the backend.
pub const EXPIRY_DAYS_MIN: u32 = 1;
pub const EXPIRY_DAYS_MAX: u32 = 365;

/// Tolerance for quantity-grid checks on fractional steps.
const QUANTITY_EPSILON: f64 = 1e-6;

/// A locally detected input problem; shown inline, never sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Rejects empty credential fields before a sign-in request goes out.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    if credentials.username.trim().is_empty() {
        return Err(ValidationError::new("Username must not be empty"));
    }
    if credentials.password.is_empty() {
        return Err(ValidationError::new("Password must not be empty"));
    }
    Ok(())
}

/// Checks a quantity against its category's bounds and step grid.
pub fn validate_quantity(quantity: f64, category: &Category) -> Result<(), ValidationError> {
    if !quantity.is_finite() {
        return Err(ValidationError::new("Quantity must be a number"));
    }
    if quantity < category.min_value || quantity > category.max_value {
        return Err(ValidationError::new(format!(
            "Quantity must be between {} and {} {}",
            category.min_value, category.max_value, category.default_unit,
        )));
    }
    if category.unit_step > 0.0 {
        let steps = quantity / category.unit_step;
        if (steps - steps.round()).abs() > QUANTITY_EPSILON {
            return Err(ValidationError::new(format!(
                "Quantity must be a multiple of {} {}",
                category.unit_step, category.default_unit,
            )));
        }
    }
    Ok(())
}

/// Checks an expiry-warning window against the backend's accepted range.
pub fn validate_expiry_days(days: u32) -> Result<(), ValidationError> {
    if !(EXPIRY_DAYS_MIN..=EXPIRY_DAYS_MAX).contains(&days) {
        return Err(ValidationError::new(format!(
            "Expiry days must be between {EXPIRY_DAYS_MIN} and {EXPIRY_DAYS_MAX}",
        )));
    }
    Ok(())
}
