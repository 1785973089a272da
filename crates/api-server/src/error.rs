use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use thiserror::Error;
use tracing::{error, warn};

/// A failed student operation, labelled with what the handler was doing
#[derive(Error, Debug)]
#[error("{context}: {source}")]
pub struct ApiError {
    context: &'static str,
    source: DomainError,
}

impl ApiError {
    pub fn new(context: &'static str, source: DomainError) -> Self {
        Self { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self.source {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::DuplicateEmail(_) => StatusCode::CONFLICT,
            DomainError::StoreUnavailable(_) | DomainError::CorruptRecord(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if status == StatusCode::NOT_FOUND {
            warn!("{}", self);
            "Student not found".to_string()
        } else if status.is_server_error() {
            // Store details stay in the log
            error!("{}", self);
            self.context.to_string()
        } else {
            warn!("{}", self);
            self.to_string()
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ValidationErrors;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                DomainError::ValidationFailed(ValidationErrors::default()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::DuplicateEmail("a@b.com".into()), StatusCode::CONFLICT),
            (
                DomainError::StoreUnavailable("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::CorruptRecord("bad row".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (source, expected) in cases {
            assert_eq!(ApiError::new("Error", source).status(), expected);
        }
    }

    #[tokio::test]
    async fn server_errors_hide_store_details() {
        let response = ApiError::new(
            "Error loading students",
            DomainError::StoreUnavailable("disk I/O error at /var/db".into()),
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Error loading students");
    }
}
