use crate::{
    db_types::{ActivityRecord, NewActivity, RequestId},
    traits::FormationStoreError,
};

#[allow(async_fn_in_trait)]
pub trait ActivityLog {
    async fn record_activity(&self, activity: NewActivity) -> Result<ActivityRecord, FormationStoreError>;

    /// The audit trail for the request, oldest first.
    async fn fetch_activity(&self, id: &RequestId) -> Result<Vec<ActivityRecord>, FormationStoreError>;
}
