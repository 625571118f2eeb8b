use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;

use crate::{
    db_types::{FormationRequest, PaymentSnapshot, RequestId},
    events::{EventProducers, PaymentRecordedEvent},
    fpe_api::{
        errors::ReconciliationError,
        reconciliation_objects::{ReconciliationOutcome, ReconciliationResult, STATUS_CHECK},
        status_flow_api::StatusFlowApi,
    },
    matching::{find_candidates, is_paid, rank_candidates, MatchContext},
    traits::{FormationDatabase, OrderFeed, SnapshotWrite},
};

pub const DEFAULT_LOOKBACK_HOURS: i64 = 48;

/// `ReconciliationApi` finds the external order that pays for a formation request and records it.
///
/// There is no reliable webhook from the commerce platform, so the customer's browser (or a poller) calls
/// [`Self::reconcile`] until the payment shows up. Every call is safe to repeat: once a snapshot is stored it is never
/// replaced, and the order feed is not queried again.
pub struct ReconciliationApi<B, F> {
    feed: F,
    status_flow: StatusFlowApi<B>,
    producers: EventProducers,
    lookback: Duration,
}

impl<B, F> Debug for ReconciliationApi<B, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi (lookback {}h)", self.lookback.num_hours())
    }
}

impl<B, F> ReconciliationApi<B, F>
where B: Clone
{
    pub fn new(db: B, feed: F, producers: EventProducers) -> Self {
        let status_flow = StatusFlowApi::new(db, producers.clone());
        Self { feed, status_flow, producers, lookback: Duration::hours(DEFAULT_LOOKBACK_HOURS) }
    }

    /// Sets how far back the order feed is searched.
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn db(&self) -> &B {
        self.status_flow.db()
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }
}

impl<B, F> ReconciliationApi<B, F>
where
    B: FormationDatabase,
    F: OrderFeed,
{
    /// Looks for a paid order for the request and records it, then brings the request status up to date.
    ///
    /// * If a snapshot is already on file, it is returned as-is and the order feed is not called.
    /// * Otherwise, recent orders are matched, ranked and classified. Only a classified-paid order is ever recorded.
    /// * The snapshot write is conditional. If a concurrent call got there first, its snapshot is returned instead and
    ///   no audit entry is written for this call.
    pub async fn reconcile(&self, id: &RequestId) -> Result<ReconciliationResult, ReconciliationError> {
        let request =
            self.db().fetch_request(id).await?.ok_or_else(|| ReconciliationError::RequestNotFound(id.clone()))?;
        let (outcome, request) = match request.payment_snapshot.clone() {
            Some(snapshot) => {
                debug!("🧾️ {id} already has a payment recorded (order {})", snapshot.order_number);
                (ReconciliationOutcome::AlreadyRecorded(snapshot), request)
            },
            None => self.discover_payment(request).await?,
        };
        let request = match outcome.snapshot() {
            Some(_) => self.status_flow.advance(request, "payment_recorded").await?,
            None => request,
        };
        Ok(ReconciliationResult::new(&outcome, request.status))
    }

    async fn discover_payment(
        &self,
        request: FormationRequest,
    ) -> Result<(ReconciliationOutcome, FormationRequest), ReconciliationError> {
        let since = Utc::now() - self.lookback;
        let orders = self.feed.fetch_orders_since(since).await?;
        trace!("🧾️ {} orders in the lookback window for {}", orders.len(), request.id);
        let ctx = MatchContext::for_request(&request);
        let candidates = find_candidates(&ctx, orders);
        let Some(best) = rank_candidates(candidates) else {
            debug!("🧾️ No order found for {} yet", request.id);
            return Ok((ReconciliationOutcome::NoOrderFound, request));
        };
        let order = best.order;
        if !is_paid(&order) {
            debug!("🧾️ Order {} for {} is {}. Not paid yet.", order.order_number, request.id, order.financial_status);
            let outcome = ReconciliationOutcome::OrderNotPaid {
                order_number: order.order_number.clone(),
                financial_status: order.normalized_financial_status(),
            };
            return Ok((outcome, request));
        }
        let snapshot = PaymentSnapshot::from_order(&order, STATUS_CHECK);
        let signals = best.signals.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        info!(
            "🧾️ Order {} ({} {}, test: {}) pays for {}. Matched on: {signals}",
            order.order_number, snapshot.total_price, snapshot.currency, snapshot.is_test_order, request.id
        );
        match self.db().record_payment_snapshot(&request.id, snapshot.clone()).await? {
            SnapshotWrite::Written(updated) => {
                let event = PaymentRecordedEvent::new(updated.clone(), snapshot.clone());
                self.producers.publish_payment_recorded(event).await;
                Ok((ReconciliationOutcome::PaymentRecorded(snapshot), updated))
            },
            SnapshotWrite::AlreadyPresent(existing) => {
                debug!(
                    "🧾️ Lost the snapshot write for {}. Order {} was recorded first.",
                    request.id, existing.order_number
                );
                let current = self
                    .db()
                    .fetch_request(&request.id)
                    .await?
                    .ok_or_else(|| ReconciliationError::RequestNotFound(request.id.clone()))?;
                Ok((ReconciliationOutcome::AlreadyRecorded(existing), current))
            },
        }
    }
}
