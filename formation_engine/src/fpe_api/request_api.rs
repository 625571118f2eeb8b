use std::fmt::Debug;

use log::*;
use serde_json::json;

use crate::{
    db_types::{
        ActivityRecord,
        CheckoutSession,
        FormationRequest,
        NewActivity,
        NewFormationRequest,
        RequestId,
        UploadedDocument,
    },
    traits::{FormationDatabase, FormationStoreError},
};

/// `RequestApi` covers the plain bookkeeping around formation requests: creating them, reading them back, and noting
/// when the customer was sent to the checkout.
pub struct RequestApi<B> {
    db: B,
}

impl<B> Debug for RequestApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RequestApi")
    }
}

impl<B> RequestApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> RequestApi<B>
where B: FormationDatabase
{
    pub async fn create_request(&self, request: NewFormationRequest) -> Result<FormationRequest, FormationStoreError> {
        let request = self.db.insert_request(request).await?;
        let details = json!({
            "company_name": request.company_name,
            "package_name": request.package_name,
            "package_price": request.package_price.to_string(),
        });
        self.db.record_activity(NewActivity::new(&request.id, "request_created", details)).await?;
        info!("🗃️ Formation request {} created for user {}", request.id, request.user_id);
        Ok(request)
    }

    pub async fn fetch_request(&self, id: &RequestId) -> Result<FormationRequest, FormationStoreError> {
        self.db.fetch_request(id).await?.ok_or_else(|| FormationStoreError::RequestNotFound(id.clone()))
    }

    /// Remembers the storefront cart the customer was sent to. This is only ever a matching hint.
    pub async fn record_checkout_session(
        &self,
        id: &RequestId,
        session: CheckoutSession,
    ) -> Result<FormationRequest, FormationStoreError> {
        let details = json!({ "cart_id": session.cart_id, "checkout_url": session.checkout_url });
        let request = self.db.record_checkout_session(id, session).await?;
        self.db.record_activity(NewActivity::new(id, "checkout_started", details)).await?;
        debug!("🗃️ Checkout session recorded for {id}");
        Ok(request)
    }

    pub async fn activity(&self, id: &RequestId) -> Result<Vec<ActivityRecord>, FormationStoreError> {
        self.fetch_request(id).await?;
        self.db.fetch_activity(id).await
    }

    pub async fn documents(&self, id: &RequestId) -> Result<Vec<UploadedDocument>, FormationStoreError> {
        self.fetch_request(id).await?;
        self.db.fetch_documents(id).await
    }
}
