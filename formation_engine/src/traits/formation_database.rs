use thiserror::Error;

use crate::{
    db_types::{RequestId, RequestStatus},
    traits::{ActivityLog, DocumentManagement, RequestManagement},
};

/// This trait defines the highest level of behaviour for backends supporting the formation engine.
#[allow(async_fn_in_trait)]
pub trait FormationDatabase: Clone + RequestManagement + DocumentManagement + ActivityLog {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Closes the underlying connection pool. Pending queries are allowed to finish.
    async fn close(&mut self) -> Result<(), FormationStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum FormationStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The formation request {0} does not exist")]
    RequestNotFound(RequestId),
    #[error("Cannot insert formation request, since {0} already exists")]
    RequestAlreadyExists(RequestId),
    #[error("The requested status change would result in a no-op. The request is already {0}.")]
    StatusChangeNoOp(RequestStatus),
    #[error("The requested status change is forbidden. {0}")]
    StatusChangeForbidden(String),
    #[error("Stored data could not be read back. {0}")]
    CorruptData(String),
}

impl From<sqlx::Error> for FormationStoreError {
    fn from(e: sqlx::Error) -> Self {
        FormationStoreError::DatabaseError(e.to_string())
    }
}
