use std::fmt::Display;

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    commerce_order::{CommerceOrder, OrderAttribute},
    db_types::FormationRequest,
};

/// Property and attribute keys that carry a request id. `company_request_id` is the legacy name.
pub const REQUEST_ID_KEYS: [&str; 2] = ["request_id", "company_request_id"];

/// The independent pieces of evidence that can tie an order to a request, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    /// The order note contains the request id
    NoteContainsRequestId,
    /// The order's checkout or cart token is the cart we recorded when checkout started
    CheckoutToken,
    /// A line item property carries the request id
    LineItemProperty,
    /// An order-level note attribute carries the request id
    OrderAttribute,
    /// The billing or shipping company looks like the company being formed. Weakest signal.
    CompanyName,
}

impl Display for MatchSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchSignal::NoteContainsRequestId => "note",
            MatchSignal::CheckoutToken => "checkout_token",
            MatchSignal::LineItemProperty => "line_item_property",
            MatchSignal::OrderAttribute => "order_attribute",
            MatchSignal::CompanyName => "company_name",
        };
        f.write_str(s)
    }
}

/// The identity signals of a request that orders are tested against.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub request_id: &'a str,
    pub cart_id: Option<&'a str>,
    pub company_name: &'a str,
}

impl<'a> MatchContext<'a> {
    pub fn for_request(request: &'a FormationRequest) -> Self {
        Self { request_id: request.id.as_str(), cart_id: request.cart_id(), company_name: &request.company_name }
    }
}

pub struct MatchRule {
    pub signal: MatchSignal,
    pub matches: fn(&MatchContext<'_>, &CommerceOrder) -> bool,
}

/// Every rule is evaluated independently, and any single hit makes the order a candidate.
pub const MATCH_RULES: [MatchRule; 5] = [
    MatchRule { signal: MatchSignal::NoteContainsRequestId, matches: note_contains_request_id },
    MatchRule { signal: MatchSignal::CheckoutToken, matches: checkout_token_matches },
    MatchRule { signal: MatchSignal::LineItemProperty, matches: line_item_property_matches },
    MatchRule { signal: MatchSignal::OrderAttribute, matches: order_attribute_matches },
    MatchRule { signal: MatchSignal::CompanyName, matches: company_name_matches },
];

/// An order that matched at least one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub order: CommerceOrder,
    pub signals: Vec<MatchSignal>,
}

/// Returns the signals the order matches, in rule order. An empty list means the order is not a candidate.
pub fn match_signals(ctx: &MatchContext<'_>, order: &CommerceOrder) -> Vec<MatchSignal> {
    MATCH_RULES.iter().filter(|rule| (rule.matches)(ctx, order)).map(|rule| rule.signal).collect()
}

pub fn find_candidates(ctx: &MatchContext<'_>, orders: Vec<CommerceOrder>) -> Vec<Candidate> {
    let total = orders.len();
    let candidates = orders
        .into_iter()
        .filter_map(|order| {
            let signals = match_signals(ctx, &order);
            if signals.is_empty() {
                return None;
            }
            trace!("🔎️ Order {} matches request {} on {signals:?}", order.order_number, ctx.request_id);
            Some(Candidate { order, signals })
        })
        .collect::<Vec<_>>();
    debug!("🔎️ {} of {total} orders are candidates for request {}", candidates.len(), ctx.request_id);
    candidates
}

fn note_contains_request_id(ctx: &MatchContext<'_>, order: &CommerceOrder) -> bool {
    !ctx.request_id.is_empty() && order.note.as_deref().map(|n| n.contains(ctx.request_id)).unwrap_or(false)
}

/// Cart and checkout identifiers come in several shapes (`c1-abc`, `gid://shopify/Cart/c1-abc?key=..`,
/// `https://shop/cart/c/c1-abc`), so only the final path segment is compared.
fn checkout_token_matches(ctx: &MatchContext<'_>, order: &CommerceOrder) -> bool {
    let Some(cart_id) = ctx.cart_id.map(trailing_segment).filter(|s| !s.is_empty()) else {
        return false;
    };
    order.session_tokens().map(trailing_segment).any(|token| token == cart_id)
}

fn line_item_property_matches(ctx: &MatchContext<'_>, order: &CommerceOrder) -> bool {
    has_request_id_attribute(ctx, order.line_item_properties())
}

fn order_attribute_matches(ctx: &MatchContext<'_>, order: &CommerceOrder) -> bool {
    has_request_id_attribute(ctx, order.note_attributes.iter())
}

fn company_name_matches(ctx: &MatchContext<'_>, order: &CommerceOrder) -> bool {
    let wanted = ctx.company_name.trim().to_lowercase();
    if wanted.is_empty() {
        return false;
    }
    order.company_names().map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty()).any(|company| {
        company.contains(&wanted) || wanted.contains(&company)
    })
}

fn has_request_id_attribute<'o, I>(ctx: &MatchContext<'_>, mut attributes: I) -> bool
where I: Iterator<Item = &'o OrderAttribute> {
    !ctx.request_id.is_empty() &&
        attributes.any(|a| REQUEST_ID_KEYS.iter().any(|k| *k == a.name.trim()) && a.value.trim() == ctx.request_id)
}

fn trailing_segment(token: &str) -> &str {
    let token = token.trim();
    let token = token.split(&['?', '#'][..]).next().unwrap_or(token);
    token.trim_end_matches('/').rsplit('/').next().unwrap_or(token)
}
