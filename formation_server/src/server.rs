use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use formation_engine::{events::EventProducers, ReconciliationApi, RequestApi, SqliteDatabase, StatusFlowApi};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::shopify::ShopifyOrderFeed,
    notifications::create_notification_handlers,
    routes::{
        health,
        CreateRequestRoute,
        FetchRequestRoute,
        OverrideStatusRoute,
        ReconcileRoute,
        RecordCheckoutRoute,
        RefreshStatusRoute,
        RequestActivityRoute,
        UploadDocumentRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        info!("🗃️ Bringing the database schema up to date");
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let feed = ShopifyOrderFeed::new(config.shopify_config.clone());
    let handlers = create_notification_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, feed, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    feed: ShopifyOrderFeed,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let lookback = config.order_lookback;
    let srv = HttpServer::new(move || {
        let requests_api = RequestApi::new(db.clone());
        let status_api = StatusFlowApi::new(db.clone(), producers.clone());
        let reconciliation_api =
            ReconciliationApi::new(db.clone(), feed.clone(), producers.clone()).with_lookback(lookback);
        let api_scope = web::scope("/api")
            .service(CreateRequestRoute::<SqliteDatabase>::new())
            .service(FetchRequestRoute::<SqliteDatabase>::new())
            .service(RecordCheckoutRoute::<SqliteDatabase>::new())
            .service(ReconcileRoute::<SqliteDatabase, ShopifyOrderFeed>::new())
            .service(UploadDocumentRoute::<SqliteDatabase>::new())
            .service(RefreshStatusRoute::<SqliteDatabase>::new())
            .service(OverrideStatusRoute::<SqliteDatabase>::new())
            .service(RequestActivityRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fps::access_log"))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(requests_api))
            .app_data(web::Data::new(status_api))
            .app_data(web::Data::new(reconciliation_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed bodies get the same JSON error shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ServerError::InvalidRequestPath(format!("Invalid query string. {err}")).into())
}
