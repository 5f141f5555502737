use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bloodbank_core::StorageError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session error: {0}")]
    Session(#[from] StorageError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        // every variant is a server fault; details stay in the logs
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let error_message = "Something went wrong".to_string();
        tracing::error!(error = %self, "Request failed");

        (
            status,
            Json(ErrorResponse {
                error: error_message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let response =
            AppError::Session(StorageError("cookie store down".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn template_errors_are_server_faults() {
        let response = AppError::Template(askama::Error::Fmt(std::fmt::Error)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
