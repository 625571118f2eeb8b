use std::str::FromStr;

use cucumber::{given, then, when};
use fp_common::Cents;
use formation_engine::{
    commerce_order::CommerceOrderBuilder,
    db_types::{CheckoutSession, DocumentType, RequestStatus},
};

use crate::cucumber::FormationWorld;

#[given(expr = "the customer has uploaded an {word} document")]
async fn uploaded_document(world: &mut FormationWorld, document_type: String) {
    upload(world, &document_type).await;
}

#[when(expr = "the customer uploads an {word} document")]
async fn upload_document(world: &mut FormationWorld, document_type: String) {
    upload(world, &document_type).await;
}

async fn upload(world: &mut FormationWorld, document_type: &str) {
    let document_type = DocumentType::from_str(document_type).expect("Unknown document type");
    let id = world.request_id();
    let result = world.system().status.record_document_upload(&id, document_type, None).await;
    result.expect("Error uploading document");
}

#[when(expr = "the customer starts a checkout with cart {string}")]
async fn start_checkout(world: &mut FormationWorld, cart: String) {
    let id = world.request_id();
    world.system().requests.record_checkout_session(&id, CheckoutSession::new(cart)).await.expect("Error");
}

#[when(expr = "a {word} order {word} for {word} USD with note {string} appears in the shop")]
async fn order_with_note(world: &mut FormationWorld, status: String, number: String, price: String, note: String) {
    let price = Cents::from_str(&price).expect("Invalid price");
    let order = CommerceOrderBuilder::new()
        .financial_status(&status)
        .order_number(&number)
        .total_price(price)
        .note(&note)
        .build();
    world.system().feed.add_order(order);
}

#[when(expr = "a {word} test order {word} for {word} USD with line item property {word} = {word} appears in the shop")]
async fn test_order_with_property(
    world: &mut FormationWorld,
    status: String,
    number: String,
    price: String,
    key: String,
    value: String,
) {
    let price = Cents::from_str(&price).expect("Invalid price");
    let order = CommerceOrderBuilder::new()
        .financial_status(&status)
        .test_order(true)
        .order_number(&number)
        .total_price(price)
        .line_item_property(&key, &value)
        .build();
    world.system().feed.add_order(order);
}

#[when(expr = "a {word} order {word} with checkout token {string} appears in the shop")]
async fn order_with_checkout_token(world: &mut FormationWorld, status: String, number: String, token: String) {
    let order =
        CommerceOrderBuilder::new().financial_status(&status).order_number(&number).checkout_token(&token).build();
    world.system().feed.add_order(order);
}

#[when(expr = "a {word} order {word} billed to {string} appears in the shop")]
async fn order_for_company(world: &mut FormationWorld, status: String, number: String, company: String) {
    let order =
        CommerceOrderBuilder::new().financial_status(&status).order_number(&number).billing_company(&company).build();
    world.system().feed.add_order(order);
}

#[when("the customer checks the payment status")]
async fn check_payment(world: &mut FormationWorld) {
    let id = world.request_id();
    let result = world.system().reconciliation.reconcile(&id).await.expect("Reconciliation failed");
    world.system_mut().last_result = Some(result);
}

#[when(expr = "an administrator moves the request to {word}")]
async fn admin_override(world: &mut FormationWorld, status: String) {
    let status = RequestStatus::from_str(&status).expect("Unknown status");
    let id = world.request_id();
    world.system().status.override_status(&id, status, "cucumber").await.expect("Override failed");
}

#[then("the payment is recorded")]
async fn payment_recorded(world: &mut FormationWorld) {
    let result = world.system().last_result.as_ref().expect("No payment check was made");
    assert!(result.has_payment, "Expected a payment, got {result:?}");
    assert!(!result.already_recorded, "Expected a fresh payment, got {result:?}");
}

#[then("the payment was already recorded")]
async fn payment_already_recorded(world: &mut FormationWorld) {
    let result = world.system().last_result.as_ref().expect("No payment check was made");
    assert!(result.has_payment && result.already_recorded, "Expected an existing payment, got {result:?}");
}

#[then("no order is found")]
async fn no_order(world: &mut FormationWorld) {
    let result = world.system().last_result.as_ref().expect("No payment check was made");
    assert!(!result.order_found && !result.has_payment, "Expected nothing, got {result:?}");
}

#[then(expr = "order {word} is found but not paid")]
async fn order_not_paid(world: &mut FormationWorld, number: String) {
    let result = world.system().last_result.as_ref().expect("No payment check was made");
    assert!(result.order_found && !result.has_payment, "Expected an unpaid order, got {result:?}");
    assert_eq!(result.order_number.as_deref(), Some(number.as_str()));
}

#[then(expr = "the recorded order is {word}")]
async fn recorded_order(world: &mut FormationWorld, number: String) {
    let id = world.request_id();
    let request = world.system().requests.fetch_request(&id).await.expect("Error fetching request");
    let snapshot = request.payment_snapshot.expect("No payment snapshot");
    assert_eq!(snapshot.order_number, number);
}

#[then(expr = "the request status is {word}")]
async fn request_status(world: &mut FormationWorld, status: String) {
    let expected = RequestStatus::from_str(&status).expect("Unknown status");
    let id = world.request_id();
    let request = world.system().requests.fetch_request(&id).await.expect("Error fetching request");
    assert_eq!(request.status, expected);
}

#[then(expr = "the order feed was queried {int} time(s)")]
async fn feed_calls(world: &mut FormationWorld, count: usize) {
    assert_eq!(world.system().feed.call_count(), count);
}
