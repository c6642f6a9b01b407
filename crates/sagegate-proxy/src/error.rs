//! HTTP mapping for gateway errors.
//!
//! Every failure leaves the proxy as an OpenAI-style [`ErrorResponse`]
//! envelope with the status suggested by the core classification.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sagegate_core::GatewayError;
use tracing::{error, warn};

use crate::models::ErrorResponse;

/// Axum-facing wrapper around [`GatewayError`].
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.suggested_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            warn!(
                status = status.as_u16(),
                error_type = self.0.error_type(),
                code = self.0.code(),
                "Request rejected: {}",
                self.0
            );
        } else {
            error!(
                status = status.as_u16(),
                error_type = self.0.error_type(),
                "Request failed: {}",
                self.0
            );
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::validation("missing_prompt", "x"), StatusCode::BAD_REQUEST),
            (GatewayError::NotFound("/x".into()), StatusCode::NOT_FOUND),
            (GatewayError::BackendInvocation("x".into()), StatusCode::BAD_GATEWAY),
            (GatewayError::BackendResponseFormat("x".into()), StatusCode::BAD_GATEWAY),
            (GatewayError::BackendTimeout, StatusCode::GATEWAY_TIMEOUT),
            (GatewayError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.is_client_error(), expected.is_client_error(), "{err}");
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
