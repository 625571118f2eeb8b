use std::env;

use fp_common::Secret;
use log::*;

use crate::ShopifyApiError;

pub const DEFAULT_SHOPIFY_API_VERSION: &str = "2024-04";

#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// The shop domain, e.g. "my-shop.myshopify.com"
    pub shop: String,
    pub admin_access_token: Secret<String>,
    pub api_version: String,
}

impl ShopifyConfig {
    pub fn new(shop: &str, admin_access_token: &str) -> Self {
        Self {
            shop: shop.to_string(),
            admin_access_token: Secret::new(admin_access_token.to_string()),
            api_version: DEFAULT_SHOPIFY_API_VERSION.to_string(),
        }
    }

    /// Loads the Shopify configuration from the environment.
    ///
    /// There are no useful defaults for the shop or the access token, so if either is missing, a
    /// [`ShopifyApiError::Configuration`] error is returned. Only the API version falls back to a default.
    pub fn try_from_env() -> Result<Self, ShopifyApiError> {
        let shop = env::var("FPS_SHOPIFY_SHOP")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ShopifyApiError::Configuration("FPS_SHOPIFY_SHOP is not set".to_string()))?;
        let admin_access_token = env::var("FPS_SHOPIFY_ADMIN_ACCESS_TOKEN")
            .map(Secret::new)
            .ok()
            .filter(|s| !s.is_blank())
            .ok_or_else(|| {
                ShopifyApiError::Configuration("FPS_SHOPIFY_ADMIN_ACCESS_TOKEN is not set".to_string())
            })?;
        let api_version = env::var("FPS_SHOPIFY_API_VERSION").unwrap_or_else(|_| {
            warn!("🪛️ FPS_SHOPIFY_API_VERSION not set, using {DEFAULT_SHOPIFY_API_VERSION} as default");
            DEFAULT_SHOPIFY_API_VERSION.to_string()
        });
        Ok(Self { shop, admin_access_token, api_version })
    }

    pub fn validate(&self) -> Result<(), ShopifyApiError> {
        if self.shop.trim().is_empty() {
            return Err(ShopifyApiError::Configuration("The shop domain is empty".to_string()));
        }
        if self.admin_access_token.is_blank() {
            return Err(ShopifyApiError::Configuration("The admin access token is empty".to_string()));
        }
        Ok(())
    }
}
