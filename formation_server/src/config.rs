use std::env;

use chrono::Duration;
use formation_engine::fpe_api::reconciliation_api::DEFAULT_LOOKBACK_HOURS;
use fp_common::helpers::parse_boolean_flag;
use log::*;
use shopify_tools::ShopifyConfig;

const DEFAULT_FPS_HOST: &str = "127.0.0.1";
const DEFAULT_FPS_PORT: u16 = 8370;
const DEFAULT_FPS_DATABASE_URL: &str = "sqlite://data/formation_store.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, pending database migrations are applied when the server starts.
    pub run_migrations: bool,
    /// How far back the order feed is searched for an order matching a request.
    pub order_lookback: Duration,
    /// Shopify order feed configuration. A missing configuration does not stop the server from starting, but every
    /// reconciliation attempt will fail with a configuration error.
    pub shopify_config: Result<ShopifyConfig, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FPS_HOST.to_string(),
            port: DEFAULT_FPS_PORT,
            database_url: DEFAULT_FPS_DATABASE_URL.to_string(),
            run_migrations: true,
            order_lookback: Duration::hours(DEFAULT_LOOKBACK_HOURS),
            shopify_config: Err("Shopify has not been configured".to_string()),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FPS_HOST").ok().unwrap_or_else(|| DEFAULT_FPS_HOST.into());
        let port = env::var("FPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FPS_PORT. {e} Using the default, {DEFAULT_FPS_PORT}, instead."
                    );
                    DEFAULT_FPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FPS_PORT);
        let database_url = env::var("FPS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ FPS_DATABASE_URL is not set. Using the default, {DEFAULT_FPS_DATABASE_URL}.");
            DEFAULT_FPS_DATABASE_URL.to_string()
        });
        let run_migrations = parse_boolean_flag(env::var("FPS_RUN_MIGRATIONS").ok(), true);
        let order_lookback = configure_order_lookback();
        let shopify_config = ShopifyConfig::try_from_env().map_err(|e| {
            warn!("🪛️ {e}. The server will start, but payment reconciliation is disabled until this is fixed.");
            e.to_string()
        });
        Self { host, port, database_url, run_migrations, order_lookback, shopify_config }
    }
}

fn configure_order_lookback() -> Duration {
    let default_lookback = Duration::hours(DEFAULT_LOOKBACK_HOURS);
    env::var("FPS_ORDER_LOOKBACK_HOURS")
        .map_err(|_| {
            info!("🪛️ FPS_ORDER_LOOKBACK_HOURS is not set. Using the default value of {DEFAULT_LOOKBACK_HOURS} hrs.")
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for FPS_ORDER_LOOKBACK_HOURS. {e}"))
                .and_then(|h| {
                    if h > 0 {
                        Ok(Duration::hours(h))
                    } else {
                        warn!("🪛️ FPS_ORDER_LOOKBACK_HOURS must be positive. Got {h}.");
                        Err(())
                    }
                })
        })
        .ok()
        .unwrap_or(default_lookback)
}
