use crate::{
    db_types::{DocumentType, RequestId, UploadedDocument},
    traits::FormationStoreError,
};

#[allow(async_fn_in_trait)]
pub trait DocumentManagement {
    /// Records that a document of the given type was uploaded. The file itself lives elsewhere.
    async fn insert_document(
        &self,
        id: &RequestId,
        document_type: DocumentType,
        file_name: Option<String>,
    ) -> Result<UploadedDocument, FormationStoreError>;

    /// All documents uploaded for the request, oldest first.
    async fn fetch_documents(&self, id: &RequestId) -> Result<Vec<UploadedDocument>, FormationStoreError>;

    /// The distinct document types on file for the request.
    async fn fetch_document_types(&self, id: &RequestId) -> Result<Vec<DocumentType>, FormationStoreError> {
        let mut types = self.fetch_documents(id).await?.into_iter().map(|d| d.document_type).collect::<Vec<_>>();
        types.sort_by_key(|t| t.as_str());
        types.dedup();
        Ok(types)
    }
}
