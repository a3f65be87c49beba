//! Input validation helpers
//!
//! Centralized text length constants and a field-error collector.
//! Validators report every failing field at once instead of stopping at the first.

use serde::Serialize;

// ── Text length limits ──────────────────────────────────────────────

/// Person / item names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone numbers, gateway ids
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation result ───────────────────────────────────────────────

/// A single failing input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of validating raw input into a typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    Valid(T),
    Invalid(Vec<FieldError>),
}

impl<T> Validated<T> {
    pub fn into_result(self) -> Result<T, Vec<FieldError>> {
        match self {
            Validated::Valid(v) => Ok(v),
            Validated::Invalid(errors) => Err(errors),
        }
    }
}

/// Collects field errors while a validator walks its input
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Required string: non-empty after trimming and within `max_len`.
    pub fn required_text(&mut self, value: &str, field: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(field, format!("{field} must not be empty"));
        } else if value.len() > max_len {
            self.push(
                field,
                format!("{field} is too long ({} chars, max {max_len})", value.len()),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the value only when no field failed.
    pub fn finish<T>(self, build: impl FnOnce() -> T) -> Validated<T> {
        if self.0.is_empty() {
            Validated::Valid(build())
        } else {
            Validated::Invalid(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failure() {
        let mut errors = FieldErrors::new();
        errors.required_text("  ", "name", MAX_NAME_LEN);
        errors.required_text(&"x".repeat(MAX_SHORT_TEXT_LEN + 1), "phone", MAX_SHORT_TEXT_LEN);
        errors.required_text("ok", "address", MAX_ADDRESS_LEN);

        let Validated::Invalid(list) = errors.finish(|| ()) else {
            panic!("expected invalid");
        };
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].field, "name");
        assert_eq!(list[1].field, "phone");
    }

    #[test]
    fn builds_value_when_clean() {
        let errors = FieldErrors::new();
        assert_eq!(errors.finish(|| 7), Validated::Valid(7));
    }
}
