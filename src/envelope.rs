//! Response Envelope
//!
//! Every backend response is wrapped as `{status, data, message}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Status value the backend uses for a successful call
pub const STATUS_SUCCESS: &str = "success";

/// Backend response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Unwrap `data`, rejecting non-success envelopes
    pub fn into_data(self) -> ClientResult<T> {
        if !self.is_success() {
            return Err(ClientError::Envelope {
                message: self
                    .message
                    .unwrap_or_else(|| "Invalid response format from API".to_string()),
            });
        }
        self.data
            .ok_or_else(|| ClientError::Decode("missing data".to_string()))
    }

    /// Like [`Envelope::into_data`] but keeps the server message alongside
    pub fn into_parts(self) -> ClientResult<(T, Option<String>)> {
        let message = self.message.clone();
        self.into_data().map(|data| (data, message))
    }
}

/// Decode an enveloped body
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> ClientResult<Envelope<T>> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Best-effort `message` extraction from an error body
pub fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct MessageOnly {
        #[serde(default)]
        message: Option<String>,
    }

    serde_json::from_slice::<MessageOnly>(body)
        .ok()
        .and_then(|m| m.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_unwraps() {
        let env: Envelope<Vec<u32>> =
            decode(br#"{"status":"success","data":[1,2,3],"message":"ok"}"#).unwrap();
        assert_eq!(env.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_envelope_uses_server_message() {
        let env: Envelope<Vec<u32>> =
            decode(br#"{"status":"error","message":"Member already exists"}"#).unwrap();
        let err = env.into_data().unwrap_err();
        assert_eq!(err.message(), "Member already exists");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(br#"{"status":"error","message":"Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(error_message(b"<html>bad gateway</html>"), None);
        assert_eq!(error_message(br#"{"message":"  "}"#), None);
    }
}
