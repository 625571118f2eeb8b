use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::{
    db_types::{ActivityRecord, NewActivity, RequestId},
    traits::FormationStoreError,
};

#[derive(Debug, FromRow)]
struct ActivityRow {
    id: i64,
    request_id: String,
    action: String,
    details: Json<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityRecord {
    fn from(row: ActivityRow) -> Self {
        ActivityRecord {
            id: row.id,
            request_id: RequestId::from(row.request_id),
            action: row.action,
            details: row.details.0,
            created_at: row.created_at,
        }
    }
}

pub async fn insert_activity(
    activity: NewActivity,
    conn: &mut SqliteConnection,
) -> Result<ActivityRecord, FormationStoreError> {
    let row: ActivityRow = sqlx::query_as(
        r#"
            INSERT INTO activity_log (request_id, action, details, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(activity.request_id.as_str())
    .bind(activity.action)
    .bind(Json(activity.details))
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(row.into())
}

pub async fn fetch_activity(
    id: &RequestId,
    conn: &mut SqliteConnection,
) -> Result<Vec<ActivityRecord>, FormationStoreError> {
    let rows: Vec<ActivityRow> = sqlx::query_as("SELECT * FROM activity_log WHERE request_id = $1 ORDER BY id")
        .bind(id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(ActivityRecord::from).collect())
}

/// The number of activity records with the given action for the request.
pub async fn count_activity(
    id: &RequestId,
    action: &str,
    conn: &mut SqliteConnection,
) -> Result<i64, FormationStoreError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM activity_log WHERE request_id = $1 AND action = $2")
        .bind(id.as_str())
        .bind(action)
        .fetch_one(conn)
        .await?;
    Ok(count)
}
