//! Per-field validation messages returned with 422 responses.

use serde::Serialize;
use std::collections::BTreeMap;

/// Field name to messages, serialized as `{"field": ["..."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First message, followed by a count of the remaining ones.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut messages = self.0.values().flatten();
        let Some(first) = messages.next() else {
            return "Validation failed".to_string();
        };
        match messages.count() {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// Trimmed non-empty value, or a "required" error.
pub fn required<'a>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(v),
        None => {
            errors.add(field, format!("The {} field is required.", label(field)));
            None
        }
    }
}

/// Character-count bounds. `None` bounds are not checked.
pub fn length(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    min: Option<usize>,
    max: Option<usize>,
) {
    let len = value.chars().count();
    if let Some(min) = min
        && len < min
    {
        errors.add(
            field,
            format!("The {} must be at least {min} characters.", label(field)),
        );
    }
    if let Some(max) = max
        && len > max
    {
        errors.add(
            field,
            format!("The {} must not be greater than {max} characters.", label(field)),
        );
    }
}

pub fn taken(errors: &mut FieldErrors, field: &str) {
    errors.add(field, format!("The {} has already been taken.", label(field)));
}

/// Reference to a row that does not exist.
pub fn invalid(errors: &mut FieldErrors, field: &str) {
    errors.add(field, format!("The selected {} is invalid.", label(field)));
}

pub fn not_integer(errors: &mut FieldErrors, field: &str) {
    errors.add(field, format!("The {} must be an integer.", label(field)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        let mut errors = FieldErrors::new();
        assert_eq!(required(&mut errors, "name", Some("  Ann ")), Some("Ann"));
        assert!(errors.is_empty());

        assert_eq!(required(&mut errors, "user_name", Some("   ")), None);
        assert_eq!(
            errors.get("user_name"),
            Some(&["The user name field is required.".to_string()][..])
        );
    }

    #[test]
    fn test_length_bounds() {
        let mut errors = FieldErrors::new();
        length(&mut errors, "username", "ab", Some(3), Some(50));
        length(&mut errors, "name", &"x".repeat(256), None, Some(255));
        assert_eq!(
            errors.get("username").unwrap()[0],
            "The username must be at least 3 characters."
        );
        assert_eq!(
            errors.get("name").unwrap()[0],
            "The name must not be greater than 255 characters."
        );
    }

    #[test]
    fn test_summary() {
        assert_eq!(FieldErrors::new().summary(), "Validation failed");

        let mut errors = FieldErrors::single("password", "The password field is required.");
        assert_eq!(errors.summary(), "The password field is required.");

        errors.add("username", "The username field is required.");
        assert_eq!(
            errors.summary(),
            "The password field is required. (and 1 more error)"
        );
    }

    #[test]
    fn test_serializes_as_map() {
        let errors = FieldErrors::single("movie_id", "The selected movie id is invalid.");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"movie_id": ["The selected movie id is invalid."]})
        );
    }
}
