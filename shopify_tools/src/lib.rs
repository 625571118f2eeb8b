//! A thin client for the parts of the Shopify Admin REST API that the formation payment server relies on.
//!
//! The only data we need from the store is the order feed: a time-bounded listing of orders (of any status), with
//! enough detail to match an order against a formation request and decide whether it has been paid.
mod api;
mod config;
mod error;
pub mod helpers;
mod shopify_order;

pub use api::ShopifyApi;
pub use config::ShopifyConfig;
pub use error::ShopifyApiError;
pub use shopify_order::{LineItem, NameValue, OrderAddress, OrderBuilder, ShopifyOrder};
