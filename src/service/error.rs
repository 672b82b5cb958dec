use axum::http::StatusCode;
use thiserror::Error;

use crate::{
    client::ClientError,
    error::{ErrorMessage, HttpError},
    models::disputemodel::PhaseError,
};

use super::team_assignment_service::AssignmentError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("An account with email {0} already exists")]
    DuplicateAccount(String),

    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(String),

    #[error("Database misconfigured: {0}")]
    DatabaseMisconfigured(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Verification token is invalid")]
    InvalidToken,

    #[error("Verification token has expired")]
    TokenExpired,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Job {0} has no backjob")]
    BackjobNotFound(i64),

    #[error("Backjob for job {job_id} cannot be marked complete while {phase}")]
    BackjobNotActionable { job_id: i64, phase: String },

    #[error(transparent)]
    InconsistentBackjob(#[from] PhaseError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error("Required fields are empty: {}", .0.join(", "))]
    MissingKycFields(Vec<String>),

    #[error("No KYC extraction is available for review")]
    KycNotExtracted,

    #[error("Refund amount must be greater than zero")]
    InvalidRefundAmount,

    #[error("Transaction {0} is not holding escrow")]
    NotReleasable(i64),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ServiceError::DuplicateAccount(
                    db_err
                        .constraint()
                        .unwrap_or("unique constraint")
                        .to_string(),
                )
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => ServiceError::DatabaseUnavailable(err.to_string()),
            sqlx::Error::Configuration(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => ServiceError::DatabaseMisconfigured(err.to_string()),
            _ => ServiceError::Database(err.to_string()),
        }
    }
}

impl From<ErrorMessage> for ServiceError {
    fn from(err: ErrorMessage) -> Self {
        match err {
            ErrorMessage::EmptyPassword | ErrorMessage::ExceededMaxPasswordLength(_) => {
                ServiceError::Validation(err.to_string())
            }
            ErrorMessage::InvalidToken => ServiceError::InvalidToken,
            ErrorMessage::TokenExpired => ServiceError::TokenExpired,
            _ => ServiceError::Hashing(err.to_string()),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DuplicateAccount(_) => StatusCode::CONFLICT,

            ServiceError::DatabaseUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,

            ServiceError::Validation(_)
            | ServiceError::InvalidToken
            | ServiceError::TokenExpired
            | ServiceError::BackjobNotActionable { .. }
            | ServiceError::InconsistentBackjob(_)
            | ServiceError::Assignment(_)
            | ServiceError::MissingKycFields(_)
            | ServiceError::InvalidRefundAmount
            | ServiceError::NotReleasable(_) => StatusCode::BAD_REQUEST,

            ServiceError::BackjobNotFound(_) | ServiceError::KycNotExtracted => StatusCode::NOT_FOUND,

            // Backend 4xx are passed through, anything else is a bad gateway.
            ServiceError::Client(e) => match e.status() {
                Some(status) if e.is_client_error() => {
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST)
                }
                _ => StatusCode::BAD_GATEWAY,
            },

            ServiceError::DatabaseMisconfigured(_)
            | ServiceError::Database(_)
            | ServiceError::Hashing(_)
            | ServiceError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        match status {
            StatusCode::CONFLICT => {
                HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string())
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!("{}", error);
                HttpError::service_unavailable(ErrorMessage::DatabaseUnavailable.to_string())
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("{}", error);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            _ => HttpError::new(error.to_string(), status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_unavailable() {
        let err = ServiceError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ServiceError::from(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn schema_mismatches_are_server_errors() {
        let err = ServiceError::from(sqlx::Error::ColumnNotFound("verify_token".to_string()));
        assert!(matches!(err, ServiceError::DatabaseMisconfigured(_)));

        let http: HttpError = err.into();
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.message, ErrorMessage::ServerError.to_string());
    }

    #[test]
    fn duplicate_account_maps_to_conflict() {
        let http: HttpError = ServiceError::DuplicateAccount("a@b.co".to_string()).into();
        assert_eq!(http.status, StatusCode::CONFLICT);
    }

    #[test]
    fn backend_client_errors_pass_through() {
        let err = ServiceError::from(ClientError::Api {
            status: 403,
            message: "Only agencies can assign employees".to_string(),
        });
        let http: HttpError = err.into();
        assert_eq!(http.status, StatusCode::FORBIDDEN);
        assert_eq!(http.message, "Only agencies can assign employees");

        let err = ServiceError::from(ClientError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = ServiceError::MissingKycFields(vec!["last_name".into(), "birth_date".into()]);
        assert_eq!(err.to_string(), "Required fields are empty: last_name, birth_date");
    }
}
