use formation_engine::{
    db_types::{CheckoutSession, DocumentType, NewFormationRequest, RequestId, RequestStatus},
    ReconciliationResult,
};
use fp_common::Cents;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequestParams {
    pub id: RequestId,
    pub user_id: String,
    pub company_name: String,
    #[serde(default)]
    pub package_name: Option<String>,
    /// In cents
    #[serde(default)]
    pub package_price: Option<Cents>,
}

impl From<NewRequestParams> for NewFormationRequest {
    fn from(params: NewRequestParams) -> Self {
        let mut request = NewFormationRequest::new(params.id, &params.user_id, &params.company_name);
        if let Some(name) = params.package_name {
            request.package_name = name;
        }
        if let Some(price) = params.package_price {
            request.package_price = price;
        }
        request
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutParams {
    pub cart_id: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
}

impl From<CheckoutParams> for CheckoutSession {
    fn from(params: CheckoutParams) -> Self {
        let mut session = CheckoutSession::new(params.cart_id);
        session.checkout_url = params.checkout_url;
        session
    }
}

/// Query parameters for the reconcile endpoint.
///
/// `payment_attempted` is the client's own "I sent the customer to the checkout" marker. It is never used for
/// matching; the server only tells the client whether it may clear it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileParams {
    #[serde(default)]
    pub payment_attempted: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    #[serde(flatten)]
    pub result: ReconciliationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_payment_attempted: Option<bool>,
}

impl ReconcileResponse {
    /// The marker may be cleared once a payment is on file. Without a marker there is nothing to echo.
    pub fn new(result: ReconciliationResult, params: &ReconcileParams) -> Self {
        let clear_payment_attempted = params.payment_attempted.map(|attempted| attempted && result.has_payment);
        Self { result, clear_payment_attempted }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUploadParams {
    pub document_type: DocumentType,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOverrideParams {
    pub status: RequestStatus,
    #[serde(default)]
    pub reason: Option<String>,
}
