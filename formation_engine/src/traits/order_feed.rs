use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::commerce_order::CommerceOrder;

#[derive(Debug, Clone, Error)]
pub enum OrderFeedError {
    /// The feed cannot be queried at all, e.g. credentials are missing. No call was made.
    #[error("The order feed is not configured. {0}")]
    Configuration(String),
    /// The call was made, but failed (network, non-2xx response, undecodable body).
    #[error("Could not fetch orders. {0}")]
    Transport(String),
}

/// A read-only, time-bounded listing of orders from the external commerce system.
#[allow(async_fn_in_trait)]
pub trait OrderFeed {
    /// Every order created at or after `since`, regardless of financial or fulfilment status.
    async fn fetch_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<CommerceOrder>, OrderFeedError>;
}
