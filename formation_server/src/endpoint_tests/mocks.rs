use chrono::{DateTime, Utc};
use formation_engine::{commerce_order::CommerceOrder, OrderFeed, OrderFeedError};
use mockall::mock;

mock! {
    pub CommerceFeed {}
    impl OrderFeed for CommerceFeed {
        async fn fetch_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<CommerceOrder>, OrderFeedError>;
    }
}
