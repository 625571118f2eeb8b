use actix_web::{
    http::{header::ContentType, StatusCode},
    test,
    test::TestRequest,
    App,
};
use formation_engine::test_utils::prepare_env::{drop_test_database, new_test_database};
use serde_json::json;

use super::{
    helpers::{as_json, configure_routes, insert_request, send, COMPANY},
    mocks::MockCommerceFeed,
};

#[actix_web::test]
async fn create_and_fetch_request() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), MockCommerceFeed::new()))).await;

    let body = json!({ "id": "req_new", "user_id": "user_1", "company_name": COMPANY, "package_price": 49_900 });
    let (status, body) = send(&app, TestRequest::post().uri("/requests").set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    let json = as_json(&body);
    assert_eq!(json["id"], "req_new");
    assert_eq!(json["status"], "pending_payment");
    assert_eq!(json["package_name"], "Standard");
    assert_eq!(json["package_price"], 49_900);
    assert!(json["payment_snapshot"].is_null());

    let (status, body) = send(&app, TestRequest::get().uri("/requests/req_new").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["company_name"], COMPANY);

    let body = json!({ "id": "req_new", "user_id": "user_2", "company_name": "Someone Else Ltd" });
    let (status, body) = send(&app, TestRequest::post().uri("/requests").set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("already exists"));

    drop(app);
    drop_test_database(db).await;
}

#[actix_web::test]
async fn bad_requests() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), MockCommerceFeed::new()))).await;

    let (status, body) = send(&app, TestRequest::get().uri("/requests/req_missing").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("req_missing"));

    let req = TestRequest::post()
        .uri("/requests")
        .insert_header(ContentType::json())
        .set_payload(r#"{"id":"req_half"}"#)
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(as_json(&body)["error"].is_string());

    let (status, _) = send(&app, TestRequest::get().uri("/requests/req_missing/activity").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    drop(app);
    drop_test_database(db).await;
}

#[actix_web::test]
async fn checkout_session_and_activity() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let id = insert_request(&db, "req_cart").await;
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), MockCommerceFeed::new()))).await;

    let body = json!({ "cart_id": "Z2NwLXVzLWVhc3QxOjAxSEZHN0", "checkout_url": "https://acme.example/cart/c/Z2Nw" });
    let uri = format!("/requests/{}/checkout", id.as_str());
    let (status, body) = send(&app, TestRequest::post().uri(&uri).set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["checkout_session"]["cart_id"], "Z2NwLXVzLWVhc3QxOjAxSEZHN0");
    assert_eq!(json["status"], "pending_payment");

    let uri = format!("/requests/{}/activity", id.as_str());
    let (status, body) = send(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    let actions = json.as_array().unwrap().iter().map(|a| a["action"].as_str().unwrap()).collect::<Vec<_>>();
    assert!(actions.contains(&"request_created"));
    assert!(actions.contains(&"checkout_started"));

    drop(app);
    drop_test_database(db).await;
}

#[actix_web::test]
async fn status_overrides() {
    let _ = env_logger::try_init();
    let db = new_test_database().await;
    let id = insert_request(&db, "req_admin").await;
    let app = test::init_service(App::new().configure(configure_routes(db.clone(), MockCommerceFeed::new()))).await;
    let uri = format!("/requests/{}/status", id.as_str());

    let body = json!({ "status": "processing", "reason": "Paid by bank transfer" });
    let (status, body) = send(&app, TestRequest::patch().uri(&uri).set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["status"], "processing");
    assert!(json["completed_at"].is_null());

    let body = json!({ "status": "processing" });
    let (status, _) = send(&app, TestRequest::patch().uri(&uri).set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({ "status": "paid" });
    let (status, _) = send(&app, TestRequest::patch().uri(&uri).set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({ "status": "completed", "reason": "Filed" });
    let (status, body) = send(&app, TestRequest::patch().uri(&uri).set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    let json = as_json(&body);
    assert_eq!(json["status"], "completed");
    assert!(json["completed_at"].is_string());

    let body = json!({ "status": "in_review" });
    let (status, body) = send(&app, TestRequest::patch().uri(&uri).set_json(body).to_request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("final"));

    drop(app);
    drop_test_database(db).await;
}
