use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::{Error, UpstreamError};

/// Error as returned to HTTP clients: status + structured body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        ApiError(Error::Upstream(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(Error::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(Error::Validation(rejection.body_text()))
    }
}

fn classify(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        Error::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        Error::Upstream(e) if e.is_timeout() => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
        Error::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        // Status follows whatever failed inside the computation
        Error::CacheCompute { source, .. } => classify(source),
        Error::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        Error::Config(_) | Error::HttpClient(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = classify(&self.0);
        if status.is_server_error() {
            error!(error = %self.0, code, "Request failed");
        } else {
            warn!(error = %self.0, code, "Request rejected");
        }

        let body = Json(json!({
            "status": "error",
            "code": code,
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let upstream = UpstreamError::Status { provider: "coingecko", status: 429, body: "slow down".into() };
        assert_eq!(classify(&Error::NotFound("x".into())).0, StatusCode::NOT_FOUND);
        assert_eq!(classify(&Error::Validation("x".into())).0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(classify(&Error::Upstream(upstream.clone())).0, StatusCode::BAD_GATEWAY);
        assert_eq!(
            classify(&Error::cache_compute("exchanges:default:true", Error::Upstream(upstream))).0,
            StatusCode::BAD_GATEWAY
        );

        let timeout = UpstreamError::Transport { provider: "binance", message: "timed out".into(), timeout: true };
        assert_eq!(classify(&Error::Upstream(timeout)).0, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_upstream_status_into_response() {
        let err = ApiError(Error::Upstream(UpstreamError::Status {
            provider: "binance",
            status: 418,
            body: "teapot".into(),
        }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
