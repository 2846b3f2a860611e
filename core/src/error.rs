//! Error types for the request pipeline.
//!
//! # Design
//! One enum covers every stage of a round trip: building the request,
//! encoding its body, the transport call, status validation and envelope
//! decoding. Transport failures are carried untouched so callers can
//! downcast to the concrete transport error if they need to.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors produced while building, executing or decoding a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL and path did not form a valid URL, or a method name was
    /// outside the supported set.
    #[error("{message}")]
    Construction { message: String },

    /// The request body could not be serialized to JSON.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// The transport failed before producing a response.
    #[error(transparent)]
    Transport(TransportError),

    /// The server answered with a status outside 200..=299.
    #[error("Invalid status code: {status}")]
    HttpStatus { status: u16 },

    /// The response body did not match `{"data": T}`.
    #[error("decoding failed: {0}")]
    Decoding(String),
}

impl ApiError {
    pub(crate) fn construction(message: impl Into<String>) -> Self {
        ApiError::Construction {
            message: message.into(),
        }
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The rejected status code, if this is an `HttpStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_message_is_displayed_verbatim() {
        let err = ApiError::construction("Invalid network path");
        assert_eq!(err.message(), "Invalid network path");
    }

    #[test]
    fn status_is_exposed_only_for_http_status() {
        assert_eq!(ApiError::HttpStatus { status: 404 }.status(), Some(404));
        assert_eq!(ApiError::Decoding("x".into()).status(), None);
    }

    #[test]
    fn transport_error_is_transparent() {
        let inner: TransportError = "connection reset".into();
        let err = ApiError::Transport(inner);
        assert_eq!(err.to_string(), "connection reset");
    }
}
