use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
    Mutex,
};

use chrono::{DateTime, Utc};
use formation_engine::{commerce_order::CommerceOrder, OrderFeed, OrderFeedError};

/// An in-memory order feed. Clones share the same orders and call counter.
#[derive(Debug, Clone, Default)]
pub struct StaticOrderFeed {
    orders: Arc<Mutex<Vec<CommerceOrder>>>,
    calls: Arc<AtomicUsize>,
    failure: Option<OrderFeedError>,
}

impl StaticOrderFeed {
    pub fn new(orders: Vec<CommerceOrder>) -> Self {
        Self { orders: Arc::new(Mutex::new(orders)), ..Default::default() }
    }

    /// A feed that fails every call with the given error.
    pub fn failing(error: OrderFeedError) -> Self {
        Self { failure: Some(error), ..Default::default() }
    }

    pub fn add_order(&self, order: CommerceOrder) {
        self.orders.lock().unwrap().push(order);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OrderFeed for StaticOrderFeed {
    async fn fetch_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<CommerceOrder>, OrderFeedError> {
        if let Some(OrderFeedError::Configuration(e)) = &self.failure {
            return Err(OrderFeedError::Configuration(e.clone()));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().filter(|o| o.created_at >= since).cloned().collect())
    }
}
