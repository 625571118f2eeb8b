use chrono::{DateTime, Utc};
use fp_common::Cents;
use log::*;
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::{
    db_types::{CheckoutSession, FormationRequest, NewFormationRequest, PaymentSnapshot, RequestId, RequestStatus},
    traits::FormationStoreError,
};

/// The raw shape of a `formation_requests` row. The JSON columns and the status string are checked when converting
/// into a [`FormationRequest`].
#[derive(Debug, FromRow)]
struct FormationRequestRow {
    id: String,
    user_id: String,
    company_name: String,
    package_name: String,
    package_price: i64,
    status: String,
    payment_snapshot: Option<Json<PaymentSnapshot>>,
    checkout_session: Option<Json<CheckoutSession>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<FormationRequestRow> for FormationRequest {
    type Error = FormationStoreError;

    fn try_from(row: FormationRequestRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<RequestStatus>().map_err(|e| FormationStoreError::CorruptData(e.to_string()))?;
        Ok(FormationRequest {
            id: RequestId::from(row.id),
            user_id: row.user_id,
            company_name: row.company_name,
            package_name: row.package_name,
            package_price: Cents::from(row.package_price),
            status,
            payment_snapshot: row.payment_snapshot.map(|j| j.0),
            checkout_session: row.checkout_session.map(|j| j.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

fn into_request(row: Option<FormationRequestRow>) -> Result<Option<FormationRequest>, FormationStoreError> {
    row.map(FormationRequest::try_from).transpose()
}

/// Inserts a new request in `pending_payment`. Duplicate ids are reported as `RequestAlreadyExists`.
pub async fn insert_request(
    request: NewFormationRequest,
    conn: &mut SqliteConnection,
) -> Result<FormationRequest, FormationStoreError> {
    let now = Utc::now();
    let id = request.id.clone();
    let row: FormationRequestRow = sqlx::query_as(
        r#"
            INSERT INTO formation_requests (
                id,
                user_id,
                company_name,
                package_name,
                package_price,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *;
        "#,
    )
    .bind(request.id.as_str())
    .bind(request.user_id)
    .bind(request.company_name)
    .bind(request.package_name)
    .bind(request.package_price.value())
    .bind(RequestStatus::PendingPayment.as_str())
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db_err| db_err.is_unique_violation()) {
            FormationStoreError::RequestAlreadyExists(id.clone())
        } else {
            FormationStoreError::from(e)
        }
    })?;
    debug!("🗃️ Formation request {id} inserted");
    row.try_into()
}

pub async fn fetch_request(
    id: &RequestId,
    conn: &mut SqliteConnection,
) -> Result<Option<FormationRequest>, FormationStoreError> {
    let row = sqlx::query_as("SELECT * FROM formation_requests WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    into_request(row)
}

/// Overwrites the checkout session. Returns `None` if the request does not exist.
pub async fn update_checkout_session(
    id: &RequestId,
    session: &CheckoutSession,
    conn: &mut SqliteConnection,
) -> Result<Option<FormationRequest>, FormationStoreError> {
    let row = sqlx::query_as(
        "UPDATE formation_requests SET checkout_session = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(Json(session))
    .bind(Utc::now())
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    into_request(row)
}

/// Writes the snapshot only if the request has none yet. Returns the updated request if this call won the write, or
/// `None` if nothing was changed (the snapshot was already set, or the request does not exist).
pub async fn set_snapshot_if_absent(
    id: &RequestId,
    snapshot: &PaymentSnapshot,
    conn: &mut SqliteConnection,
) -> Result<Option<FormationRequest>, FormationStoreError> {
    let row = sqlx::query_as(
        r#"
            UPDATE formation_requests
            SET payment_snapshot = $1, updated_at = $2
            WHERE id = $3 AND payment_snapshot IS NULL
            RETURNING *;
        "#,
    )
    .bind(Json(snapshot))
    .bind(Utc::now())
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    into_request(row)
}

/// Moves the request from `old` to `new` if, and only if, it is still in `old`. Entering `completed` stamps
/// `completed_at`. Returns `None` if nothing was changed.
pub async fn set_status_if(
    id: &RequestId,
    old: RequestStatus,
    new: RequestStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<FormationRequest>, FormationStoreError> {
    let now = Utc::now();
    let completed_at = (new == RequestStatus::Completed).then_some(now);
    let row = sqlx::query_as(
        r#"
            UPDATE formation_requests
            SET status = $1, updated_at = $2, completed_at = COALESCE($3, completed_at)
            WHERE id = $4 AND status = $5
            RETURNING *;
        "#,
    )
    .bind(new.as_str())
    .bind(now)
    .bind(completed_at)
    .bind(id.as_str())
    .bind(old.as_str())
    .fetch_optional(conn)
    .await?;
    trace!("🗃️ Conditional status write {old} -> {new} for {id}");
    into_request(row)
}
