use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    web,
    web::ServiceConfig,
};
use formation_engine::{
    db_types::{NewFormationRequest, RequestId},
    events::EventProducers,
    ReconciliationApi,
    RequestApi,
    SqliteDatabase,
    StatusFlowApi,
};
use log::debug;
use serde_json::Value;

use super::mocks::MockCommerceFeed;
use crate::{
    routes::{
        CreateRequestRoute,
        FetchRequestRoute,
        OverrideStatusRoute,
        ReconcileRoute,
        RecordCheckoutRoute,
        RefreshStatusRoute,
        RequestActivityRoute,
        UploadDocumentRoute,
    },
    server::{json_config, query_config},
};

pub const COMPANY: &str = "Acme Widgets Ltd";

/// Registers every formation route against `db`, with `feed` standing in for Shopify.
pub fn configure_routes(db: SqliteDatabase, feed: MockCommerceFeed) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let producers = EventProducers::default();
        cfg.app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(RequestApi::new(db.clone())))
            .app_data(web::Data::new(StatusFlowApi::new(db.clone(), producers.clone())))
            .app_data(web::Data::new(ReconciliationApi::new(db, feed, producers)))
            .service(CreateRequestRoute::<SqliteDatabase>::new())
            .service(FetchRequestRoute::<SqliteDatabase>::new())
            .service(RecordCheckoutRoute::<SqliteDatabase>::new())
            .service(ReconcileRoute::<SqliteDatabase, MockCommerceFeed>::new())
            .service(UploadDocumentRoute::<SqliteDatabase>::new())
            .service(RefreshStatusRoute::<SqliteDatabase>::new())
            .service(OverrideStatusRoute::<SqliteDatabase>::new())
            .service(RequestActivityRoute::<SqliteDatabase>::new());
    }
}

pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, String)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    debug!("🚀️ Making request");
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn as_json(body: &str) -> Value {
    serde_json::from_str(body).expect("Response body was not JSON")
}

/// Creates a `pending_payment` request directly in the database.
pub async fn insert_request(db: &SqliteDatabase, id: &str) -> RequestId {
    let id = RequestId::new(id);
    RequestApi::new(db.clone())
        .create_request(NewFormationRequest::new(id.clone(), "user_1", COMPANY))
        .await
        .expect("Error creating request");
    id
}
