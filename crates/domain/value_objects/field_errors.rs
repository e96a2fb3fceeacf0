use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationErrors;

/// Key used for errors that do not belong to a single input field.
pub const FORM_FIELD: &str = "form";

/// Per-field validation messages, serialized as `{field: [message]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, field_errors) in value.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                errors.push(field.to_string(), message);
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_groups_messages_by_field() {
        let mut errors = FieldErrors::new();
        errors.push("year", "too old");
        errors.push("year", "not a number");
        errors.push(FORM_FIELD, "failed");

        assert_eq!(
            errors.get("year"),
            Some(&["too old".to_string(), "not a number".to_string()][..])
        );
        assert_eq!(errors.get(FORM_FIELD), Some(&["failed".to_string()][..]));
    }

    #[test]
    fn serializes_as_plain_map() {
        let errors = FieldErrors::single("plan_id", "Invalid plan selected");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"plan_id": ["Invalid plan selected"]}));
    }

    #[test]
    fn empty_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(FieldErrors::single("a", "b").into_result().is_err());
    }
}
