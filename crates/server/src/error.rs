use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use std::fmt;
use studycards_common::StudyCardsError;
use tracing::{error, warn};

use crate::types::ErrorResponse;

/// HTTP rendering of [`StudyCardsError`]
#[derive(Debug)]
pub struct ApiError(pub StudyCardsError);

impl From<StudyCardsError> for ApiError {
    fn from(err: StudyCardsError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ApiError {
    /// Message shown to API clients. Raw payloads and upstream bodies stay in the logs.
    fn public_message(&self) -> String {
        match &self.0 {
            StudyCardsError::MalformedResponse { .. } => "The AI returned output that could not be parsed. Try again with different text or fewer items.".to_string(),
            StudyCardsError::InvalidShape { field } => format!(
                "The AI did not return valid {}. Please try again.",
                field
            ),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self.0);
        } else {
            warn!("Request rejected ({}): {}", status, self.0);
        }

        let field = match &self.0 {
            StudyCardsError::InvalidShape { field } => Some(field.clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.public_message(),
            kind: self.0.kind().to_string(),
            field,
            retryable: self.0.is_retryable(),
        })
    }
}

/// Render JSON body extraction failures in the same error shape
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError(StudyCardsError::invalid_input(err.to_string())).into()
}
