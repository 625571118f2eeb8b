use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fp_common::Cents;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value for {0}: {1}")]
pub struct ConversionError(&'static str, String);

//--------------------------------------        RequestId        -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RequestId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

//--------------------------------------     RequestStatus       -------------------------------------------------------
/// The lifecycle of a formation request.
///
/// ```text
///  pending_payment ──► payment_completed ──► in_review ──► processing ──► completed
///                             │    ▲             ▲
///                             ▼    │             │
///                      documents_requested ──────┘
///
///  rejected / cancelled: reachable from any state before `completed`, and absorbing.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted, no payment has been recorded yet.
    PendingPayment,
    /// Payment recorded, but not every required document has been uploaded.
    PaymentCompleted,
    /// An administrator has explicitly asked the customer for (more) documents.
    DocumentsRequested,
    /// Paid and documented. Waiting for a human to look at it.
    InReview,
    /// Accepted and being filed.
    Processing,
    Completed,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 8] = [
        RequestStatus::PendingPayment,
        RequestStatus::PaymentCompleted,
        RequestStatus::DocumentsRequested,
        RequestStatus::InReview,
        RequestStatus::Processing,
        RequestStatus::Completed,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::PendingPayment => "pending_payment",
            RequestStatus::PaymentCompleted => "payment_completed",
            RequestStatus::DocumentsRequested => "documents_requested",
            RequestStatus::InReview => "in_review",
            RequestStatus::Processing => "processing",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Rejected | RequestStatus::Cancelled)
    }

    /// Position along the forward path of the lifecycle. `None` for the side branches (`rejected`, `cancelled`).
    pub fn progress(&self) -> Option<u8> {
        match self {
            RequestStatus::PendingPayment => Some(0),
            RequestStatus::PaymentCompleted => Some(1),
            RequestStatus::DocumentsRequested => Some(2),
            RequestStatus::InReview => Some(3),
            RequestStatus::Processing => Some(4),
            RequestStatus::Completed => Some(5),
            RequestStatus::Rejected | RequestStatus::Cancelled => None,
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ConversionError("request status", s.to_string()))
    }
}

//--------------------------------------     PaymentSnapshot     -------------------------------------------------------
/// The payment facts of an external order, frozen at the moment the order was discovered.
///
/// Once stored on a request, a snapshot is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSnapshot {
    /// The order id as assigned by the commerce platform
    pub order_id: String,
    /// The human-readable order number, e.g. "#1001"
    pub order_number: String,
    pub total_price: Cents,
    pub currency: String,
    pub financial_status: String,
    pub is_test_order: bool,
    pub discovered_at: DateTime<Utc>,
    /// Free-text provenance, e.g. "status_check"
    pub discovery_method: String,
}

//--------------------------------------     CheckoutSession     -------------------------------------------------------
/// Recorded when the customer is sent to the storefront checkout. Only ever used as a hint when matching orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub cart_id: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    pub initiated_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new<S: Into<String>>(cart_id: S) -> Self {
        Self { cart_id: cart_id.into(), checkout_url: None, initiated_at: Utc::now() }
    }
}

//--------------------------------------    FormationRequest     -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationRequest {
    pub id: RequestId,
    pub user_id: String,
    pub company_name: String,
    pub package_name: String,
    pub package_price: Cents,
    pub status: RequestStatus,
    pub payment_snapshot: Option<PaymentSnapshot>,
    pub checkout_session: Option<CheckoutSession>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl FormationRequest {
    pub fn has_payment(&self) -> bool {
        self.payment_snapshot.is_some()
    }

    pub fn cart_id(&self) -> Option<&str> {
        self.checkout_session.as_ref().map(|s| s.cart_id.as_str())
    }
}

//--------------------------------------  NewFormationRequest    -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFormationRequest {
    pub id: RequestId,
    pub user_id: String,
    pub company_name: String,
    pub package_name: String,
    pub package_price: Cents,
}

impl NewFormationRequest {
    pub fn new(id: RequestId, user_id: &str, company_name: &str) -> Self {
        Self {
            id,
            user_id: user_id.to_string(),
            company_name: company_name.to_string(),
            package_name: "Standard".to_string(),
            package_price: Cents::from_units(249),
        }
    }

    pub fn with_package(mut self, name: &str, price: Cents) -> Self {
        self.package_name = name.to_string();
        self.package_price = price;
        self
    }
}

//--------------------------------------      DocumentType       -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Passport or national identity card of the founder
    Identity,
    /// Utility bill or bank statement no older than three months
    AddressProof,
    BusinessPlan,
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] =
        [DocumentType::Identity, DocumentType::AddressProof, DocumentType::BusinessPlan, DocumentType::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Identity => "identity",
            DocumentType::AddressProof => "address_proof",
            DocumentType::BusinessPlan => "business_plan",
            DocumentType::Other => "other",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, DocumentType::Identity | DocumentType::AddressProof)
    }

    pub fn required_types() -> impl Iterator<Item = DocumentType> {
        DocumentType::ALL.into_iter().filter(DocumentType::is_required)
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConversionError("document type", s.to_string()))
    }
}

//--------------------------------------    UploadedDocument     -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: i64,
    pub request_id: RequestId,
    pub document_type: DocumentType,
    pub file_name: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

//--------------------------------------     ActivityRecord      -------------------------------------------------------
/// An entry in the append-only audit trail of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub request_id: RequestId,
    pub action: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub request_id: RequestId,
    pub action: String,
    pub details: serde_json::Value,
}

impl NewActivity {
    pub fn new(request_id: &RequestId, action: &str, details: serde_json::Value) -> Self {
        Self { request_id: request_id.clone(), action: action.to_string(), details }
    }
}
