//! Request-level errors for the OAuth routes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Plate IQ answered with something other than 200. The status is passed
    /// through to the browser unchanged.
    #[error("upstream returned {0}")]
    Upstream(StatusCode),

    /// Callback `state` does not match the one issued by `/login`
    #[error("OAuth state mismatch")]
    StateMismatch,

    /// Transport failure or undecodable response body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(status) => status.into_response(),
            Self::StateMismatch => (StatusCode::BAD_REQUEST, "Invalid OAuth state").into_response(),
            Self::Http(ref e) => {
                tracing::error!(error = %e, "Provider request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_passes_through() {
        let response = AppError::Upstream(StatusCode::UNAUTHORIZED).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::Upstream(StatusCode::IM_A_TEAPOT).into_response();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn test_state_mismatch_is_bad_request() {
        let response = AppError::StateMismatch.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
