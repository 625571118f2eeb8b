use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, LINK},
    Client,
    Method,
    Response,
};
use serde::Deserialize;

use crate::{config::ShopifyConfig, helpers::next_page_info, ShopifyApiError, ShopifyOrder};

/// The largest page size the REST Admin API allows.
const ORDERS_PAGE_LIMIT: &str = "250";

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        config.validate()?;
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.admin_access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }

    async fn send(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<Response, ShopifyApiError> {
        let url = self.url(path);
        trace!("🛍️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🛍️ REST query successful. {}", response.status());
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    /// Fetches every order, of any status, created at or after `since`.
    ///
    /// The REST API paginates with cursors carried in the `Link` response header. Once a `page_info` cursor is in
    /// play, Shopify rejects any filter parameters other than `limit`, so only the first request carries the
    /// `status` and `created_at_min` filters.
    pub async fn fetch_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<ShopifyOrder>, ShopifyApiError> {
        #[derive(Deserialize)]
        struct OrdersResponse {
            orders: Vec<ShopifyOrder>,
        }
        let created_at_min = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut orders = Vec::new();
        let mut page_info: Option<String> = None;
        loop {
            let params = match &page_info {
                Some(cursor) => vec![("limit", ORDERS_PAGE_LIMIT), ("page_info", cursor.as_str())],
                None => {
                    vec![("limit", ORDERS_PAGE_LIMIT), ("status", "any"), ("created_at_min", created_at_min.as_str())]
                },
            };
            let response = self.send(Method::GET, "/orders.json", &params).await?;
            let next = response.headers().get(LINK).and_then(|v| v.to_str().ok()).and_then(next_page_info);
            let page = response.json::<OrdersResponse>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
            trace!("🛍️ Fetched a page of {} orders", page.orders.len());
            orders.extend(page.orders);
            match next {
                Some(cursor) => page_info = Some(cursor),
                None => break,
            }
        }
        debug!("🛍️ Fetched {} orders created since {created_at_min}", orders.len());
        Ok(orders)
    }
}
