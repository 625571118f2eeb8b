//! # Order matching
//!
//! Without a reliable webhook channel, the only way to learn that a formation request has been paid is to go and look
//! for its order in the commerce system. This module holds the pure, synchronous half of that process:
//!
//! * [`signals`] decides whether an order plausibly belongs to a request, and why.
//! * [`ranker`] picks one order when several are plausible.
//! * [`classifier`] decides whether the chosen order counts as paid.
//!
//! Nothing in here does any I/O. Fetching the orders is the job of an [`crate::traits::OrderFeed`], and acting on the
//! result is the job of [`crate::ReconciliationApi`].
pub mod classifier;
pub mod ranker;
pub mod signals;

pub use classifier::is_paid;
pub use ranker::{rank_candidates, RankTier};
pub use signals::{find_candidates, Candidate, MatchContext, MatchSignal, MATCH_RULES};
