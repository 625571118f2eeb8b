use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use formation_engine::{FormationStoreError, ReconciliationError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The order feed could not be reached. {0}")]
    UpstreamError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Nothing to do. {0}")]
    NoOp(String),
    #[error("Conflict. {0}")]
    Conflict(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::NoOp(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<ReconciliationError> for ServerError {
    fn from(e: ReconciliationError) -> Self {
        match e {
            ReconciliationError::Configuration(s) => {
                error!("💻️ Reconciliation is not possible until the order feed is configured. {s}");
                Self::ConfigurationError(s)
            },
            ReconciliationError::Transport(s) => Self::UpstreamError(s),
            ReconciliationError::RequestNotFound(id) => Self::NoRecordFound(format!("Formation request {id}")),
            ReconciliationError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<FormationStoreError> for ServerError {
    fn from(e: FormationStoreError) -> Self {
        match e {
            FormationStoreError::RequestNotFound(id) => Self::NoRecordFound(format!("Formation request {id}")),
            FormationStoreError::StatusChangeNoOp(_) => Self::NoOp(e.to_string()),
            FormationStoreError::StatusChangeForbidden(_) | FormationStoreError::RequestAlreadyExists(_) => {
                Self::Conflict(e.to_string())
            },
            FormationStoreError::DatabaseError(_) | FormationStoreError::CorruptData(_) => {
                Self::BackendError(e.to_string())
            },
        }
    }
}
