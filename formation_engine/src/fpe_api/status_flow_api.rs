use std::fmt::Debug;

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{DocumentType, FormationRequest, RequestId, RequestStatus, UploadedDocument},
    events::{EventProducers, StatusChangedEvent},
    lifecycle::{check_override, compute_next_status, missing_required_documents, OverrideRejection},
    traits::{FormationDatabase, FormationStoreError, StatusWrite},
};

/// `StatusFlowApi` drives the lifecycle status of formation requests.
///
/// It derives the next status from the facts on file (payment snapshot, uploaded documents) and persists it with a
/// conditional write, so two concurrent refreshes can never push a request backwards. Administrators can also force
/// a status through [`Self::override_status`].
pub struct StatusFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for StatusFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatusFlowApi")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUploadResult {
    pub document: UploadedDocument,
    pub request: FormationRequest,
    /// Required document types that are still outstanding
    pub missing_documents: Vec<DocumentType>,
}

impl<B> StatusFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> StatusFlowApi<B>
where B: FormationDatabase
{
    /// Re-derives the status of the request and stores it if it moved forward.
    pub async fn refresh_status(&self, id: &RequestId) -> Result<FormationRequest, FormationStoreError> {
        let request = self.fetch(id).await?;
        self.advance(request, "status_refresh").await
    }

    /// Records a document upload, then refreshes the status. This is how a paid request reaches `in_review` without
    /// another reconciliation.
    pub async fn record_document_upload(
        &self,
        id: &RequestId,
        document_type: DocumentType,
        file_name: Option<String>,
    ) -> Result<DocumentUploadResult, FormationStoreError> {
        let document = self.db.insert_document(id, document_type, file_name).await?;
        debug!("🚦️ {document_type} document uploaded for {id}");
        let request = self.fetch(id).await?;
        let request = self.advance(request, "document_uploaded").await?;
        let uploaded = self.db.fetch_document_types(id).await?;
        let missing_documents = missing_required_documents(uploaded);
        Ok(DocumentUploadResult { document, request, missing_documents })
    }

    /// Forces the request into `new_status`.
    ///
    /// Fails with `StatusChangeNoOp` if the request is already there, and with `StatusChangeForbidden` if it is in a
    /// terminal state or was changed by someone else while the override was being applied.
    pub async fn override_status(
        &self,
        id: &RequestId,
        new_status: RequestStatus,
        reason: &str,
    ) -> Result<FormationRequest, FormationStoreError> {
        let request = self.fetch(id).await?;
        let old_status = request.status;
        check_override(old_status, new_status).map_err(|rejection| match rejection {
            OverrideRejection::NoOp => FormationStoreError::StatusChangeNoOp(old_status),
            OverrideRejection::Terminal(s) => {
                FormationStoreError::StatusChangeForbidden(format!("{id} is {s}, which is final"))
            },
        })?;
        info!("🚦️ Administrative override for {id}: {old_status} -> {new_status}. Reason: {reason}");
        match self.db.update_status(id, old_status, new_status, reason).await? {
            StatusWrite::Updated(updated) => {
                self.notify(old_status, &updated, reason).await;
                Ok(updated)
            },
            StatusWrite::Conflict(current) => Err(FormationStoreError::StatusChangeForbidden(format!(
                "{id} changed to {} while the override was being applied",
                current.status
            ))),
        }
    }

    /// Applies the lifecycle rules to `request` and persists the result. If the request changed underneath us, the
    /// current record is returned untouched.
    pub(crate) async fn advance(
        &self,
        request: FormationRequest,
        reason: &str,
    ) -> Result<FormationRequest, FormationStoreError> {
        let uploaded = self.db.fetch_document_types(&request.id).await?;
        let docs_complete = missing_required_documents(uploaded).is_empty();
        let next = compute_next_status(request.status, request.has_payment(), docs_complete);
        if next == request.status {
            trace!("🚦️ {} stays {}", request.id, request.status);
            return Ok(request);
        }
        let old_status = request.status;
        match self.db.update_status(&request.id, old_status, next, reason).await? {
            StatusWrite::Updated(updated) => {
                info!("🚦️ {} advanced from {old_status} to {next} ({reason})", updated.id);
                self.notify(old_status, &updated, reason).await;
                Ok(updated)
            },
            StatusWrite::Conflict(current) => {
                debug!("🚦️ {} changed concurrently. Leaving it as {}", current.id, current.status);
                Ok(current)
            },
        }
    }

    async fn notify(&self, old_status: RequestStatus, request: &FormationRequest, reason: &str) {
        let event = StatusChangedEvent::new(old_status, request.clone(), reason);
        self.producers.publish_status_changed(event).await;
    }

    async fn fetch(&self, id: &RequestId) -> Result<FormationRequest, FormationStoreError> {
        self.db.fetch_request(id).await?.ok_or_else(|| FormationStoreError::RequestNotFound(id.clone()))
    }
}
