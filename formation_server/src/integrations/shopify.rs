use std::fmt::Debug;

use chrono::{DateTime, Utc};
use formation_engine::{
    commerce_order::{CommerceLineItem, CommerceOrder, OrderAttribute},
    OrderFeed,
    OrderFeedError,
};
use log::*;
use shopify_tools::{
    helpers::parse_shopify_price,
    NameValue,
    ShopifyApi,
    ShopifyApiError,
    ShopifyConfig,
    ShopifyOrder,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderConversionError {
    #[error("The Shopify order contained invalid data. {0}")]
    FormatError(String),
}

pub fn new_commerce_order_from_shopify_order(value: ShopifyOrder) -> Result<CommerceOrder, OrderConversionError> {
    trace!("🛍️ Converting ShopifyOrder to CommerceOrder: {:?}", value);
    let total_price =
        parse_shopify_price(&value.total_price).map_err(|e| OrderConversionError::FormatError(e.to_string()))?;
    let created_at =
        value.created_at.parse::<DateTime<Utc>>().map_err(|e| OrderConversionError::FormatError(e.to_string()))?;
    if value.currency.trim().is_empty() {
        return Err(OrderConversionError::FormatError(format!("Order {} has no currency", value.id)));
    }
    let order_number =
        if value.name.trim().is_empty() { format!("#{}", value.order_number) } else { value.name.clone() };
    let company = |address: Option<shopify_tools::OrderAddress>| address.and_then(|a| a.company);
    let line_items = value
        .line_items
        .into_iter()
        .map(|item| CommerceLineItem { title: item.title, properties: to_attributes(item.properties) })
        .collect();
    Ok(CommerceOrder {
        id: value.id.to_string(),
        order_number,
        financial_status: value.financial_status.unwrap_or_default(),
        is_test: value.test,
        total_price,
        currency: value.currency,
        created_at,
        note: value.note,
        note_attributes: to_attributes(value.note_attributes),
        line_items,
        billing_company: company(value.billing_address),
        shipping_company: company(value.shipping_address),
        checkout_token: value.checkout_token,
        cart_token: value.cart_token,
    })
}

/// Attributes whose values are not scalars can never match a request id, so they are dropped.
fn to_attributes(pairs: Vec<NameValue>) -> Vec<OrderAttribute> {
    pairs
        .into_iter()
        .filter_map(|pair| pair.value_as_string().map(|value| OrderAttribute { name: pair.name, value }))
        .collect()
}

/// The Shopify Admin API as an [`OrderFeed`].
///
/// The feed is created even if Shopify is not configured, so that the rest of the server can run. In that case every
/// call fails with [`OrderFeedError::Configuration`] and nothing is sent to Shopify.
#[derive(Clone)]
pub struct ShopifyOrderFeed {
    api: Result<ShopifyApi, String>,
}

impl Debug for ShopifyOrderFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.api {
            Ok(_) => write!(f, "ShopifyOrderFeed (configured)"),
            Err(e) => write!(f, "ShopifyOrderFeed (not configured: {e})"),
        }
    }
}

impl ShopifyOrderFeed {
    pub fn new(config: Result<ShopifyConfig, String>) -> Self {
        let api = config.and_then(|c| ShopifyApi::new(c).map_err(|e| e.to_string()));
        if let Err(e) = &api {
            warn!("🛍️ The Shopify order feed is unavailable. {e}");
        }
        Self { api }
    }

    pub fn is_configured(&self) -> bool {
        self.api.is_ok()
    }
}

impl OrderFeed for ShopifyOrderFeed {
    async fn fetch_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<CommerceOrder>, OrderFeedError> {
        let api = self.api.as_ref().map_err(|e| OrderFeedError::Configuration(e.clone()))?;
        let orders = api.fetch_orders_since(since).await.map_err(feed_error)?;
        let orders = orders
            .into_iter()
            .filter_map(|order| {
                let id = order.id;
                new_commerce_order_from_shopify_order(order)
                    .map_err(|e| warn!("🛍️ Skipping Shopify order {id}. {e}"))
                    .ok()
            })
            .collect();
        Ok(orders)
    }
}

fn feed_error(e: ShopifyApiError) -> OrderFeedError {
    if e.is_configuration_error() {
        OrderFeedError::Configuration(e.to_string())
    } else {
        error!("🛍️ Could not fetch orders from Shopify. {e}");
        OrderFeedError::Transport(e.to_string())
    }
}
