//! Error types for the customer API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the page renders a specific
//! "does not exist" message for it. All other non-2xx responses land in
//! `HttpError` with the status code, the server's `message` if the body
//! carried one, and the raw body for debugging.

use thiserror::Error;

use crate::http::HttpResponse;
use crate::types::ErrorBody;

/// Errors returned by `CustomerClient` parse methods and the dispatcher.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound { message: Option<String> },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host could not complete the HTTP exchange.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Build the error for a non-success response. The body is read as an
    /// `ErrorBody`; anything unparseable leaves `message` empty.
    pub(crate) fn from_response(response: &HttpResponse) -> Self {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());
        if response.status == 404 {
            return ApiError::NotFound { message };
        }
        ApiError::HttpError {
            status: response.status,
            message,
            body: response.body.clone(),
        }
    }

    /// The message supplied by the server, if the error body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message } | ApiError::HttpError { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn reads_message_from_envelope() {
        let err = ApiError::from_response(&response(
            400,
            r#"{"status":400,"error":"Bad Request","message":"missing lastname"}"#,
        ));
        assert!(matches!(err, ApiError::HttpError { status: 400, .. }));
        assert_eq!(err.server_message(), Some("missing lastname"));
    }

    #[test]
    fn unparseable_body_has_no_message() {
        let err = ApiError::from_response(&response(500, "<html>oops</html>"));
        assert!(err.server_message().is_none());
        assert_eq!(err.to_string(), "HTTP 500: <html>oops</html>");
    }

    #[test]
    fn not_found_keeps_message() {
        let err = ApiError::from_response(&response(404, r#"{"message":"gone"}"#));
        assert!(err.is_not_found());
        assert_eq!(err.server_message(), Some("gone"));
    }

    #[test]
    fn empty_message_is_treated_as_absent() {
        let err = ApiError::from_response(&response(500, r#"{"message":""}"#));
        assert!(err.server_message().is_none());
    }
}
