//! HTTP response envelope helpers
//!
//! Every JSON endpoint answers with the same `{success, message, data}`
//! envelope the frontend consumes, plus permissive CORS headers so the
//! static site can call the API from another origin.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;

/// Standard response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Build a JSON response with the given status code
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Full::new(Bytes::from(json)))
        .unwrap()
}

/// Success envelope with payload
pub fn ok<T: Serialize>(message: &str, data: T) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &ApiResponse {
            success: true,
            message: message.to_string(),
            data: Some(data),
        },
    )
}

/// Failure envelope with the given status
pub fn failure(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(
        status,
        &ApiResponse::<()> {
            success: false,
            message: message.to_string(),
            data: None,
        },
    )
}

/// 404 failure envelope
pub fn not_found(message: &str) -> Response<Full<Bytes>> {
    failure(StatusCode::NOT_FOUND, message)
}

/// Map an error to its envelope.
///
/// Validation messages go back verbatim; storage and internal failures show
/// the caller only the operation's generic message, the detail stays in the
/// logs.
pub fn error_response(error: &ApiError, generic_message: &str) -> Response<Full<Bytes>> {
    let (status, message) = match error {
        ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, error.to_string()),
        ApiError::Storage(_) | ApiError::Io(_) | ApiError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            generic_message.to_string(),
        ),
    };
    failure(status, &message)
}

/// CORS preflight response
pub fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let resp = error_response(
            &ApiError::Validation("Username is required".into()),
            "generic",
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let resp = error_response(&ApiError::Unauthorized, "generic");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn storage_failures_map_to_500() {
        let resp = error_response(&ApiError::Storage("disk full".into()), "generic");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn responses_carry_cors_header() {
        let resp = ok("done", serde_json::json!({ "n": 1 }));
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[test]
    fn failure_envelope_omits_data() {
        let resp = failure(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
