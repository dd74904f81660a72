//! Form validation helpers.
//!
//! A [`Validator`] collects field-scoped messages; handlers re-render the
//! originating page with the resulting [`FormErrors`] when any check fails.

use std::collections::BTreeMap;

use recipe_box_core::Email;

/// Error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    /// Record a message against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Accumulates validation failures across several fields.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FormErrors,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when the trimmed value is empty.
    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.add(field, "This field cannot be empty");
        }
        self
    }

    /// Fails when the value has fewer than `min` characters.
    ///
    /// Counts characters, not bytes.
    pub fn min_length(&mut self, field: &'static str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.errors.add(
                field,
                format!("This field must be at least {min} characters long"),
            );
        }
        self
    }

    /// Parses the value as an email address, recording a message on failure.
    pub fn email(&mut self, field: &'static str, value: &str) -> Option<Email> {
        match Email::parse(value) {
            Ok(email) => Some(email),
            Err(e) => {
                tracing::debug!(field, error = %e, "Email validation failed");
                self.errors.add(field, "Invalid email address");
                None
            }
        }
    }

    /// Consume the validator.
    ///
    /// # Errors
    ///
    /// Returns the collected [`FormErrors`] if any check failed.
    pub fn finish(self) -> Result<(), FormErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
