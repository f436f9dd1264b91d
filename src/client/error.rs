use std::collections::BTreeMap;
use thiserror::Error;

use crate::modules::image_host::ImageHostError;

/// Per-field messages shown next to form inputs, keyed by camelCase field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please fix the highlighted fields")]
    Validation(FieldErrors),

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },
}

impl From<ImageHostError> for ClientError {
    fn from(e: ImageHostError) -> Self {
        ClientError::Upload(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_are_ordered_by_name() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Title is required");
        errors.insert("endDate", "End date must be after start date");

        let fields: Vec<&str> = errors.iter().map(|(k, _)| k).collect();
        assert_eq!(fields, vec!["endDate", "title"]);

        errors.remove("title");
        assert_eq!(errors.len(), 1);
        assert!(!errors.contains("title"));
    }

    #[test]
    fn test_rejected_upload_message_reaches_the_user() {
        let err: ClientError = ImageHostError::Rejected {
            status: 400,
            message: "Invalid image file".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Image upload failed: Invalid image file");
    }
}
