//! Adapters that connect the formation engine to external commerce platforms.
pub mod shopify;
