use thiserror::Error;

use crate::{
    db_types::RequestId,
    traits::{FormationStoreError, OrderFeedError},
};

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    /// The order feed is not configured. No external call was made.
    #[error("The order feed is not configured. {0}")]
    Configuration(String),
    /// The order feed could not be reached or returned garbage. Nothing was written.
    #[error("Could not reach the order feed. {0}")]
    Transport(String),
    #[error("The formation request {0} does not exist")]
    RequestNotFound(RequestId),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<OrderFeedError> for ReconciliationError {
    fn from(e: OrderFeedError) -> Self {
        match e {
            OrderFeedError::Configuration(s) => ReconciliationError::Configuration(s),
            OrderFeedError::Transport(s) => ReconciliationError::Transport(s),
        }
    }
}

impl From<FormationStoreError> for ReconciliationError {
    fn from(e: FormationStoreError) -> Self {
        match e {
            FormationStoreError::RequestNotFound(id) => ReconciliationError::RequestNotFound(id),
            e => ReconciliationError::DatabaseError(e.to_string()),
        }
    }
}
