use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{DocumentType, RequestId, UploadedDocument},
    traits::FormationStoreError,
};

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: i64,
    request_id: String,
    document_type: String,
    file_name: Option<String>,
    uploaded_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for UploadedDocument {
    type Error = FormationStoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let document_type =
            row.document_type.parse::<DocumentType>().map_err(|e| FormationStoreError::CorruptData(e.to_string()))?;
        Ok(UploadedDocument {
            id: row.id,
            request_id: RequestId::from(row.request_id),
            document_type,
            file_name: row.file_name,
            uploaded_at: row.uploaded_at,
        })
    }
}

pub async fn insert_document(
    id: &RequestId,
    document_type: DocumentType,
    file_name: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<UploadedDocument, FormationStoreError> {
    let row: DocumentRow = sqlx::query_as(
        r#"
            INSERT INTO documents (request_id, document_type, file_name, uploaded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(id.as_str())
    .bind(document_type.as_str())
    .bind(file_name)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    row.try_into()
}

pub async fn fetch_documents(
    id: &RequestId,
    conn: &mut SqliteConnection,
) -> Result<Vec<UploadedDocument>, FormationStoreError> {
    let rows: Vec<DocumentRow> = sqlx::query_as("SELECT * FROM documents WHERE request_id = $1 ORDER BY id")
        .bind(id.as_str())
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(UploadedDocument::try_from).collect()
}

/// The distinct document types on file for the request.
pub async fn fetch_document_types(
    id: &RequestId,
    conn: &mut SqliteConnection,
) -> Result<Vec<DocumentType>, FormationStoreError> {
    let types: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT document_type FROM documents WHERE request_id = $1 ORDER BY document_type")
            .bind(id.as_str())
            .fetch_all(conn)
            .await?;
    types
        .iter()
        .map(|t| t.parse::<DocumentType>().map_err(|e| FormationStoreError::CorruptData(e.to_string())))
        .collect()
}
