//! Input validation helpers.
//!
//! Column length limits mirror the `employees` table definition. Helpers
//! record a message per failing field instead of returning early, so a
//! request reports every violation at once.

use rust_decimal::Decimal;

use crate::error::FieldErrors;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_DEPARTMENT_LEN: usize = 50;
pub const MAX_POSITION_LEN: usize = 100;

/// Salary column is DECIMAL(10, 2).
pub const SALARY_INTEGER_DIGITS: u32 = 8;
pub const SALARY_FRACTION_DIGITS: u32 = 2;

/// Required string: non-blank and within the length limit.
pub fn required_text(errors: &mut FieldErrors, field: &str, label: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{label} is required"));
    } else if value.chars().count() > max_len {
        errors.insert(field.to_string(), format!("{label} cannot exceed {max_len} characters"));
    }
}

/// Optional string: within the length limit when present.
pub fn optional_text(errors: &mut FieldErrors, field: &str, label: &str, value: Option<&str>, max_len: usize) {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        errors.insert(field.to_string(), format!("{label} cannot exceed {max_len} characters"));
    }
}

/// Required email: non-blank, within the length limit and well formed.
pub fn email(errors: &mut FieldErrors, field: &str, value: &str) {
    required_text(errors, field, "Email", value, MAX_EMAIL_LEN);
    if !errors.contains_key(field) && !is_valid_email(value) {
        errors.insert(field.to_string(), "Email should be valid".to_string());
    }
}

/// Optional salary: strictly positive, DECIMAL(10, 2) precision.
pub fn salary(errors: &mut FieldErrors, field: &str, value: Option<Decimal>) {
    let Some(value) = value else {
        return;
    };
    if value <= Decimal::ZERO {
        errors.insert(field.to_string(), "Salary must be greater than 0".to_string());
    } else if !fits_precision(value, SALARY_INTEGER_DIGITS, SALARY_FRACTION_DIGITS) {
        errors.insert(field.to_string(), "Salary format is invalid".to_string());
    }
}

/// Structural email check: ASCII only, one `@`, non-empty local part and
/// domain, no whitespace, domain labels non-empty.
///
/// Uniqueness compares emails with the database's `LOWER()`, which folds
/// ASCII only on some backends.
pub fn is_valid_email(value: &str) -> bool {
    if !value.is_ascii() || value.chars().any(|c| c.is_ascii_whitespace()) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

fn fits_precision(value: Decimal, integer_digits: u32, fraction_digits: u32) -> bool {
    let normalized = value.normalize();
    if normalized.scale() > fraction_digits {
        return false;
    }
    normalized.trunc().abs() < Decimal::from(10u64.pow(integer_digits))
}
