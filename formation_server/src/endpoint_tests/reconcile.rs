use actix_web::{http::StatusCode, test, test::TestRequest, App};
use formation_engine::{
    commerce_order::CommerceOrderBuilder,
    test_utils::prepare_env::{drop_test_database, new_test_database},
    OrderFeedError,
};

use super::{
    helpers::{as_json, configure_routes, insert_request, send},
    mocks::MockCommerceFeed,
};

#[actix_web::test]
async fn reconcile_records_payment_once() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let id = insert_request(&db, "req_7Hc2").await;
    let order = CommerceOrderBuilder::new()
        .order_number("#1042")
        .financial_status("paid")
        .note("Formation request req_7Hc2")
        .build();
    let mut feed = MockCommerceFeed::new();
    // The second call is answered from the stored snapshot
    feed.expect_fetch_orders_since().times(1).returning(move |_| Ok(vec![order.clone()]));
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), feed))).await;

    let uri = format!("/requests/{}/reconcile?payment_attempted=true", id.as_str());
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["hasPayment"], true);
    assert_eq!(json["orderFound"], true);
    assert_eq!(json["alreadyRecorded"], false);
    assert_eq!(json["orderNumber"], "#1042");
    assert_eq!(json["financialStatus"], "paid");
    assert_eq!(json["totalPrice"], 24_900);
    assert_eq!(json["status"], "payment_completed");
    assert_eq!(json["clearPaymentAttempted"], true);

    let uri = format!("/requests/{}/reconcile", id.as_str());
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["hasPayment"], true);
    assert_eq!(json["alreadyRecorded"], true);
    assert_eq!(json["orderNumber"], "#1042");
    assert!(json.get("clearPaymentAttempted").is_none());

    drop(app);
    drop_test_database(db).await;
}

#[actix_web::test]
async fn reconcile_unpaid_order() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let id = insert_request(&db, "req_pending").await;
    let order = CommerceOrderBuilder::new()
        .order_number("#1043")
        .financial_status("pending")
        .line_item_property("request_id", "req_pending")
        .build();
    let mut feed = MockCommerceFeed::new();
    feed.expect_fetch_orders_since().returning(move |_| Ok(vec![order.clone()]));
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), feed))).await;

    let uri = format!("/requests/{}/reconcile?payment_attempted=true", id.as_str());
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["hasPayment"], false);
    assert_eq!(json["orderFound"], true);
    assert_eq!(json["orderNumber"], "#1043");
    assert_eq!(json["financialStatus"], "pending");
    assert_eq!(json["status"], "pending_payment");
    assert_eq!(json["clearPaymentAttempted"], false);
    assert!(json.get("totalPrice").is_none());

    drop(app);
    drop_test_database(db).await;
}

#[actix_web::test]
async fn reconcile_no_order() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let id = insert_request(&db, "req_nothing").await;
    let mut feed = MockCommerceFeed::new();
    feed.expect_fetch_orders_since().returning(|_| Ok(vec![]));
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), feed))).await;

    let uri = format!("/requests/{}/reconcile", id.as_str());
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["hasPayment"], false);
    assert_eq!(json["orderFound"], false);
    assert_eq!(json["status"], "pending_payment");

    drop(app);
    drop_test_database(db).await;
}

#[actix_web::test]
async fn reconcile_feed_errors() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let id = insert_request(&db, "req_errors").await;
    let uri = format!("/requests/{}/reconcile", id.as_str());

    let mut feed = MockCommerceFeed::new();
    feed.expect_fetch_orders_since()
        .returning(|_| Err(OrderFeedError::Configuration("FPS_SHOPIFY_SHOP is not set".to_string())));
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), feed))).await;
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("FPS_SHOPIFY_SHOP"));
    drop(app);

    let mut feed = MockCommerceFeed::new();
    feed.expect_fetch_orders_since().returning(|_| Err(OrderFeedError::Transport("connection reset".to_string())));
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), feed))).await;
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("connection reset"));

    let (status, _) = send(&app, TestRequest::post().uri("/requests/req_unknown/reconcile").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/requests/{}/reconcile?payment_attempted=maybe", id.as_str());
    let (status, _) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    drop(app);
    drop_test_database(db).await;
}

#[actix_web::test]
async fn document_upload_promotes_paid_request() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let id = insert_request(&db, "req_docs").await;
    let order = CommerceOrderBuilder::new().financial_status("paid").note_attribute("request_id", "req_docs").build();
    let mut feed = MockCommerceFeed::new();
    feed.expect_fetch_orders_since().times(1).returning(move |_| Ok(vec![order.clone()]));
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), feed))).await;
    let documents_uri = format!("/requests/{}/documents", id.as_str());

    let req = TestRequest::post()
        .uri(&documents_uri)
        .set_json(serde_json::json!({ "document_type": "identity", "file_name": "passport.pdf" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["request"]["status"], "pending_payment");
    assert_eq!(json["missing_documents"], serde_json::json!(["address_proof"]));

    let uri = format!("/requests/{}/reconcile", id.as_str());
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["status"], "payment_completed");

    let req = TestRequest::post()
        .uri(&documents_uri)
        .set_json(serde_json::json!({ "document_type": "address_proof" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["request"]["status"], "in_review");
    assert_eq!(json["missing_documents"], serde_json::json!([]));

    let uri = format!("/requests/{}/status/refresh", id.as_str());
    let (status, body) = send(&app, TestRequest::post().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["status"], "in_review");

    let req = TestRequest::post()
        .uri(&documents_uri)
        .set_json(serde_json::json!({ "document_type": "selfie" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    drop(app);
    drop_test_database(db).await;
}
