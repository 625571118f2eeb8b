use crate::{
    db_types::{CheckoutSession, FormationRequest, NewFormationRequest, PaymentSnapshot, RequestId, RequestStatus},
    traits::{FormationStoreError, SnapshotWrite, StatusWrite},
};

#[allow(async_fn_in_trait)]
pub trait RequestManagement {
    /// Stores a brand-new request in `pending_payment`. Fails with `RequestAlreadyExists` if the id is taken.
    async fn insert_request(&self, request: NewFormationRequest) -> Result<FormationRequest, FormationStoreError>;

    async fn fetch_request(&self, id: &RequestId) -> Result<Option<FormationRequest>, FormationStoreError>;

    /// Replaces the checkout session hint on the request. The payment snapshot and status are left alone.
    async fn record_checkout_session(
        &self,
        id: &RequestId,
        session: CheckoutSession,
    ) -> Result<FormationRequest, FormationStoreError>;

    /// Stores the payment snapshot if, and only if, the request does not have one yet.
    ///
    /// The check and the write are a single conditional statement, so concurrent callers cannot both win. The winner
    /// also writes a `payment_recorded` activity record in the same transaction. Losers get the snapshot that is
    /// already stored and write nothing.
    async fn record_payment_snapshot(
        &self,
        id: &RequestId,
        snapshot: PaymentSnapshot,
    ) -> Result<SnapshotWrite, FormationStoreError>;

    /// Moves the request from `old` to `new`, provided it is still in `old`.
    ///
    /// Entering `completed` sets `completed_at`. A successful change writes a `status_changed` activity record (with
    /// the given `reason`) in the same transaction.
    async fn update_status(
        &self,
        id: &RequestId,
        old: RequestStatus,
        new: RequestStatus,
        reason: &str,
    ) -> Result<StatusWrite, FormationStoreError>;
}
