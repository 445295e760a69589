use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tickr::TickrError;

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed query string input.
    #[error("{0}")]
    BadRequest(String),
    /// Failure from the orchestrator.
    #[error(transparent)]
    Tickr(#[from] TickrError),
}

impl ApiError {
    /// HTTP status and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Tickr(e) => match e {
                TickrError::InvalidArg(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                TickrError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                TickrError::ProviderTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, e.to_string()),
                TickrError::Connector { .. } | TickrError::Data(_) => {
                    (StatusCode::BAD_GATEWAY, e.to_string())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        }
        let body = json!({ "error": { "message": message } });
        (status, axum::Json(body)).into_response()
    }
}

/// Failure while starting the server.
#[derive(Debug, Error)]
pub enum StartupError {
    /// An environment variable is missing or malformed.
    #[error("invalid configuration {var}: {msg}")]
    Config {
        /// Variable name.
        var: &'static str,
        /// What is wrong with it.
        msg: String,
    },
    /// The orchestrator or connector could not be built.
    #[error(transparent)]
    Tickr(#[from] TickrError),
    /// Binding or serving failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn status(e: TickrError) -> StatusCode {
        ApiError::from(e).status_and_message().0
    }

    #[test]
    fn tickr_errors_map_to_statuses() {
        assert_eq!(status(TickrError::InvalidArg("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(TickrError::not_found("history for X")), StatusCode::NOT_FOUND);
        assert_eq!(
            status(TickrError::provider_timeout("tickr-iex", "history")),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(status(TickrError::connector("tickr-iex", "HTTP 500")), StatusCode::BAD_GATEWAY);
        assert_eq!(status(TickrError::Data("bad".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status(TickrError::boundary_not_cached(
                "TSLA",
                NaiveDate::from_ymd_opt(2022, 12, 17).unwrap()
            )),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status(TickrError::Other("?".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_message_is_passed_through_verbatim() {
        let (_, msg) = ApiError::from(TickrError::InvalidArg("Ticker cannot be empty".into()))
            .status_and_message();
        assert_eq!(msg, "Ticker cannot be empty");
    }
}
