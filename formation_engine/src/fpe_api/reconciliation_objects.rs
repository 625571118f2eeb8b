use chrono::Utc;
use fp_common::Cents;
use serde::{Deserialize, Serialize};

use crate::{
    commerce_order::CommerceOrder,
    db_types::{PaymentSnapshot, RequestStatus},
};

/// Provenance recorded on snapshots discovered by polling the order feed.
pub const STATUS_CHECK: &str = "status_check";

impl PaymentSnapshot {
    /// Freezes the payment facts of `order` as of now.
    pub fn from_order(order: &CommerceOrder, discovery_method: &str) -> Self {
        Self {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            total_price: order.total_price,
            currency: order.currency.clone(),
            financial_status: order.normalized_financial_status(),
            is_test_order: order.is_test,
            discovered_at: Utc::now(),
            discovery_method: discovery_method.to_string(),
        }
    }
}

/// What a single reconciliation attempt found.
///
/// None of these are errors. "Nothing yet" is the normal answer while the customer is still at the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// No order in the lookback window carries any signal pointing at the request.
    NoOrderFound,
    /// An order was found, but it does not count as paid (yet).
    OrderNotPaid { order_number: String, financial_status: String },
    /// This call discovered the payment and stored the snapshot.
    PaymentRecorded(PaymentSnapshot),
    /// A snapshot was already on file, either from an earlier call or from a concurrent one that won the write.
    AlreadyRecorded(PaymentSnapshot),
}

impl ReconciliationOutcome {
    pub fn snapshot(&self) -> Option<&PaymentSnapshot> {
        match self {
            ReconciliationOutcome::PaymentRecorded(s) | ReconciliationOutcome::AlreadyRecorded(s) => Some(s),
            _ => None,
        }
    }
}

/// The caller-facing summary of a reconciliation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub has_payment: bool,
    pub already_recorded: bool,
    pub order_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_test_order: Option<bool>,
    /// The status of the request after the status engine has run
    pub status: RequestStatus,
}

impl ReconciliationResult {
    pub fn new(outcome: &ReconciliationOutcome, status: RequestStatus) -> Self {
        let mut result = Self {
            has_payment: false,
            already_recorded: false,
            order_found: false,
            order_number: None,
            financial_status: None,
            total_price: None,
            currency: None,
            is_test_order: None,
            status,
        };
        match outcome {
            ReconciliationOutcome::NoOrderFound => {},
            ReconciliationOutcome::OrderNotPaid { order_number, financial_status } => {
                result.order_found = true;
                result.order_number = Some(order_number.clone());
                result.financial_status = Some(financial_status.clone());
            },
            ReconciliationOutcome::PaymentRecorded(snapshot) | ReconciliationOutcome::AlreadyRecorded(snapshot) => {
                result.has_payment = true;
                result.order_found = true;
                result.already_recorded = matches!(outcome, ReconciliationOutcome::AlreadyRecorded(_));
                result.order_number = Some(snapshot.order_number.clone());
                result.financial_status = Some(snapshot.financial_status.clone());
                result.total_price = Some(snapshot.total_price);
                result.currency = Some(snapshot.currency.clone());
                result.is_test_order = Some(snapshot.is_test_order);
            },
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commerce_order::CommerceOrderBuilder;

    #[test]
    fn result_flags() {
        let not_found = ReconciliationResult::new(&ReconciliationOutcome::NoOrderFound, RequestStatus::PendingPayment);
        assert!(!not_found.has_payment && !not_found.order_found && !not_found.already_recorded);

        let outcome = ReconciliationOutcome::OrderNotPaid {
            order_number: "#1001".to_string(),
            financial_status: "pending".to_string(),
        };
        let not_paid = ReconciliationResult::new(&outcome, RequestStatus::PendingPayment);
        assert!(!not_paid.has_payment && not_paid.order_found);
        assert_eq!(not_paid.financial_status.as_deref(), Some("pending"));
        assert!(not_paid.total_price.is_none());

        let order = CommerceOrderBuilder::new().order_number("#1002").financial_status("Paid").build();
        let snapshot = PaymentSnapshot::from_order(&order, STATUS_CHECK);
        assert_eq!(snapshot.financial_status, "paid");
        let recorded = ReconciliationResult::new(
            &ReconciliationOutcome::AlreadyRecorded(snapshot),
            RequestStatus::PaymentCompleted,
        );
        assert!(recorded.has_payment && recorded.order_found && recorded.already_recorded);
        assert_eq!(recorded.total_price, Some(Cents::from_units(249)));
    }

    #[test]
    fn serialized_field_names() {
        let json = serde_json::to_value(ReconciliationResult::new(
            &ReconciliationOutcome::NoOrderFound,
            RequestStatus::PendingPayment,
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "hasPayment": false,
                "alreadyRecorded": false,
                "orderFound": false,
                "status": "pending_payment"
            })
        );
    }
}
