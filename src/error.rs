//! Client Error Types
//!
//! A single error type for everything the portal does against the backend:
//! transport failures, non-success envelopes, HTTP errors and client-side
//! form validation. Pages only ever need [`ClientError::message`].

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Fallback text when neither the server nor the transport said anything useful
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Errors surfaced by the API client, services and forms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Backend answered 401; session keys have already been cleared
    #[error("{message}")]
    Unauthorized { message: String },

    /// Envelope arrived but `status` was not `success`
    #[error("{message}")]
    Envelope { message: String },

    /// Client-side validation failed before any request was made
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Network or request construction failure
    #[error("{0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Invalid response format from API: {0}")]
    Decode(String),

    /// An operation needed a token that is not in the session
    #[error("No authentication token found. Please try again.")]
    MissingToken,

    /// Session store could not be read or written
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Report rows could not be written out
    #[error("Report export failed: {0}")]
    Export(String),
}

impl ClientError {
    /// The single user-facing message for banners and toasts
    pub fn message(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            text
        }
    }

    /// HTTP status when the error came from the backend
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// True for errors produced before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// Build a single-field validation error
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, message);
        ClientError::Validation(errors)
    }

    /// Field-level errors when this is a validation failure
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Field name to message map, ordered for stable display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Drop the error for a field once the user edits it
    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when empty, otherwise a validation error
    pub fn into_result<T>(self, value: T) -> Result<T, ClientError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(ClientError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Single-field errors read as plain sentences in banners
        let mut first = true;
        for message in self.fields.values() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_falls_back_when_empty() {
        let err = ClientError::Transport(String::new());
        assert_eq!(err.message(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");
        errors.add("email", "Email is required");
        errors.add("name", "ignored");

        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.to_string(), "Email is required; Name is required");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ClientError::Http { status: 404, message: "Not found".into() }.status(),
            Some(404)
        );
        assert_eq!(ClientError::Unauthorized { message: "x".into() }.status(), Some(401));
        assert_eq!(ClientError::MissingToken.status(), None);
    }
}
