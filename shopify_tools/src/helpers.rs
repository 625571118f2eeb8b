use std::sync::LazyLock;

use fp_common::Cents;
use regex::Regex;

use crate::ShopifyApiError;

/// Shopify expresses prices as decimal strings, e.g. "249.00".
pub fn parse_shopify_price(price: &str) -> Result<Cents, ShopifyApiError> {
    price.parse::<Cents>().map_err(|e| ShopifyApiError::InvalidCurrencyAmount(format!("{price}. {e}")))
}

static NEXT_PAGE_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"<[^>]*[?&]page_info=([^&>]+)[^>]*>;\s*rel="next""#).ok());

/// Extracts the `page_info` cursor of the `rel="next"` entry in a Shopify `Link` header, if there is one.
///
/// A typical header looks like
/// `<https://shop.myshopify.com/admin/api/2024-04/orders.json?limit=250&page_info=abc>; rel="next"`
pub fn next_page_info(link_header: &str) -> Option<String> {
    NEXT_PAGE_LINK.as_ref()?.captures(link_header).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}
