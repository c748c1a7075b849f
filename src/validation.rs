//! Field checks used by the hand-written `Validate` impls on request DTOs

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Required, non-blank, at most `max` characters
pub fn required_text(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>, max: usize) {
    match value.map(str::trim) {
        None | Some("") => errors.add(field, error("required", format!("{} is required", field))),
        Some(_) => optional_text(errors, field, value, max),
    }
}

/// At most `max` characters when present
pub fn optional_text(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.add(
                field,
                error("length", format!("{} must be at most {} characters", field, max)),
            );
        }
    }
}

/// Within `min..=max` when present
pub fn optional_range(errors: &mut ValidationErrors, field: &'static str, value: Option<i32>, min: i32, max: i32) {
    if let Some(v) = value {
        if v < min || v > max {
            errors.add(
                field,
                error("range", format!("{} must be between {} and {}", field, min, max)),
            );
        }
    }
}

pub fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
