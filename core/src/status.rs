//! Response status validation.

use bytes::Bytes;
use tracing::warn;

use crate::error::{ApiError, Result};
use crate::http::HttpResponse;

/// `true` for 200..=299.
pub fn is_valid_status(code: u16) -> bool {
    (200..=299).contains(&code)
}

/// Check the status of `response` and hand back its body.
///
/// A response without a status (not an HTTP response) is accepted as is.
/// On a rejected status the body is dropped.
pub fn validate_response(response: HttpResponse) -> Result<Bytes> {
    match response.status {
        Some(status) if !is_valid_status(status) => {
            warn!(status, "rejecting response");
            Err(ApiError::HttpStatus { status })
        }
        _ => Ok(response.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert!(!is_valid_status(199));
        assert!(is_valid_status(200));
        assert!(is_valid_status(204));
        assert!(is_valid_status(299));
        assert!(!is_valid_status(300));
        assert!(!is_valid_status(0));
        assert!(!is_valid_status(u16::MAX));
    }

    #[test]
    fn success_returns_the_body() {
        let body = validate_response(HttpResponse::new(201, "created")).unwrap();
        assert_eq!(body, Bytes::from_static(b"created"));
    }

    #[test]
    fn rejected_status_carries_the_code() {
        let err = validate_response(HttpResponse::new(500, "boom")).unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 500 }));
        assert_eq!(err.to_string(), "Invalid status code: 500");
    }

    #[test]
    fn missing_status_is_accepted() {
        let body = validate_response(HttpResponse::without_status("raw")).unwrap();
        assert_eq!(body, Bytes::from_static(b"raw"));
    }
}
