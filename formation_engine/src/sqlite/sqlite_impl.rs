//! `SqliteDatabase` is the concrete SQLite backend for the formation engine.
//!
//! It implements all the storage traits defined in [`crate::traits`].
use std::fmt::Debug;

use log::*;
use serde_json::json;
use sqlx::{migrate, SqlitePool};

use super::db::{activity, db_url, documents, new_pool, requests};
use crate::{
    db_types::{
        ActivityRecord,
        CheckoutSession,
        DocumentType,
        FormationRequest,
        NewActivity,
        NewFormationRequest,
        PaymentSnapshot,
        RequestId,
        RequestStatus,
        UploadedDocument,
    },
    traits::{
        ActivityLog,
        DocumentManagement,
        FormationDatabase,
        FormationStoreError,
        RequestManagement,
        SnapshotWrite,
        StatusWrite,
    },
};

pub const PAYMENT_RECORDED: &str = "payment_recorded";
pub const STATUS_CHANGED: &str = "status_changed";

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl FormationDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), FormationStoreError> {
        self.pool.close().await;
        Ok(())
    }
}

impl RequestManagement for SqliteDatabase {
    async fn insert_request(&self, request: NewFormationRequest) -> Result<FormationRequest, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        requests::insert_request(request, &mut conn).await
    }

    async fn fetch_request(&self, id: &RequestId) -> Result<Option<FormationRequest>, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        requests::fetch_request(id, &mut conn).await
    }

    async fn record_checkout_session(
        &self,
        id: &RequestId,
        session: CheckoutSession,
    ) -> Result<FormationRequest, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        requests::update_checkout_session(id, &session, &mut conn)
            .await?
            .ok_or_else(|| FormationStoreError::RequestNotFound(id.clone()))
    }

    async fn record_payment_snapshot(
        &self,
        id: &RequestId,
        snapshot: PaymentSnapshot,
    ) -> Result<SnapshotWrite, FormationStoreError> {
        let mut tx = self.pool.begin().await?;
        let result = match requests::set_snapshot_if_absent(id, &snapshot, &mut tx).await? {
            Some(request) => {
                let details = json!({
                    "order_id": snapshot.order_id,
                    "order_number": snapshot.order_number,
                    "is_test_order": snapshot.is_test_order,
                    "financial_status": snapshot.financial_status,
                    "amount": snapshot.total_price.to_string(),
                    "currency": snapshot.currency,
                    "discovery_method": snapshot.discovery_method,
                });
                activity::insert_activity(NewActivity::new(id, PAYMENT_RECORDED, details), &mut tx).await?;
                debug!("🗃️ Payment snapshot for order {} stored on {id}", snapshot.order_number);
                SnapshotWrite::Written(request)
            },
            None => {
                let existing = requests::fetch_request(id, &mut tx)
                    .await?
                    .ok_or_else(|| FormationStoreError::RequestNotFound(id.clone()))?;
                let existing = existing.payment_snapshot.ok_or_else(|| {
                    FormationStoreError::DatabaseError(format!("Conditional snapshot write on {id} had no effect"))
                })?;
                debug!("🗃️ {id} already has a payment snapshot (order {}). Nothing written.", existing.order_number);
                SnapshotWrite::AlreadyPresent(existing)
            },
        };
        tx.commit().await?;
        Ok(result)
    }

    async fn update_status(
        &self,
        id: &RequestId,
        old: RequestStatus,
        new: RequestStatus,
        reason: &str,
    ) -> Result<StatusWrite, FormationStoreError> {
        let mut tx = self.pool.begin().await?;
        let result = match requests::set_status_if(id, old, new, &mut tx).await? {
            Some(request) => {
                let details = json!({ "from": old, "to": new, "reason": reason });
                activity::insert_activity(NewActivity::new(id, STATUS_CHANGED, details), &mut tx).await?;
                debug!("🗃️ {id} moved from {old} to {new}");
                StatusWrite::Updated(request)
            },
            None => {
                let current = requests::fetch_request(id, &mut tx)
                    .await?
                    .ok_or_else(|| FormationStoreError::RequestNotFound(id.clone()))?;
                info!("🗃️ {id} is no longer {old} (now {}). Status write to {new} skipped.", current.status);
                StatusWrite::Conflict(current)
            },
        };
        tx.commit().await?;
        Ok(result)
    }
}

impl DocumentManagement for SqliteDatabase {
    async fn insert_document(
        &self,
        id: &RequestId,
        document_type: DocumentType,
        file_name: Option<String>,
    ) -> Result<UploadedDocument, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        if requests::fetch_request(id, &mut conn).await?.is_none() {
            return Err(FormationStoreError::RequestNotFound(id.clone()));
        }
        documents::insert_document(id, document_type, file_name, &mut conn).await
    }

    async fn fetch_documents(&self, id: &RequestId) -> Result<Vec<UploadedDocument>, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        documents::fetch_documents(id, &mut conn).await
    }

    async fn fetch_document_types(&self, id: &RequestId) -> Result<Vec<DocumentType>, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        documents::fetch_document_types(id, &mut conn).await
    }
}

impl ActivityLog for SqliteDatabase {
    async fn record_activity(&self, activity: NewActivity) -> Result<ActivityRecord, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        activity::insert_activity(activity, &mut conn).await
    }

    async fn fetch_activity(&self, id: &RequestId) -> Result<Vec<ActivityRecord>, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        activity::fetch_activity(id, &mut conn).await
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using `FPS_DATABASE_URL` (or the default) as the database location
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Migrations that have already been applied are skipped.
    pub async fn run_migrations(&self) -> Result<(), FormationStoreError> {
        migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| FormationStoreError::DatabaseError(format!("Migrations failed. {e}")))?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    /// Counts the audit entries with the given action. Handy for checking that an event was recorded exactly once.
    pub async fn count_activity(&self, id: &RequestId, action: &str) -> Result<i64, FormationStoreError> {
        let mut conn = self.pool.acquire().await?;
        activity::count_activity(id, action, &mut conn).await
    }
}
