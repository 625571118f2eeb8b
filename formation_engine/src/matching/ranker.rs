use log::*;

use crate::{commerce_order::CommerceOrder, matching::signals::Candidate};

/// Ranking tiers, best first. The company-name heuristic can easily produce several candidates, so evidence of
/// payment always beats weaker evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RankTier {
    Paid,
    TestOrder,
    AwaitingPayment,
    Other,
}

impl RankTier {
    pub fn for_order(order: &CommerceOrder) -> Self {
        match order.normalized_financial_status().as_str() {
            "paid" | "partially_paid" => RankTier::Paid,
            _ if order.is_test => RankTier::TestOrder,
            "pending" | "authorized" => RankTier::AwaitingPayment,
            _ => RankTier::Other,
        }
    }
}

/// Picks a single candidate: the best tier wins, and within a tier the most recently created order wins.
///
/// Orders created at the same instant are separated by their id, so the result never depends on the order in which
/// the feed returned them. Returns `None` only when there are no candidates.
pub fn rank_candidates(candidates: Vec<Candidate>) -> Option<Candidate> {
    let count = candidates.len();
    let best = candidates.into_iter().min_by(|a, b| {
        RankTier::for_order(&a.order)
            .cmp(&RankTier::for_order(&b.order))
            .then_with(|| b.order.created_at.cmp(&a.order.created_at))
            .then_with(|| b.order.id.cmp(&a.order.id))
    })?;
    debug!(
        "🔎️ Selected order {} ({:?}, {}) out of {count} candidates",
        best.order.order_number,
        RankTier::for_order(&best.order),
        best.order.financial_status
    );
    Some(best)
}
