use crate::commerce_order::CommerceOrder;

/// Financial statuses that mean the merchant has (at least some of) the money.
pub const PAID_FINANCIAL_STATUSES: [&str; 2] = ["paid", "partially_paid"];

/// Decides whether an order counts as paid.
///
/// Real orders must report a `paid` or `partially_paid` financial status. Test orders from a sandbox checkout never
/// capture money, so they count as paid as long as they are for a non-zero amount. That lets the whole flow be
/// exercised end to end in a development store.
pub fn is_paid(order: &CommerceOrder) -> bool {
    let status = order.normalized_financial_status();
    PAID_FINANCIAL_STATUSES.contains(&status.as_str()) || (order.is_test && order.total_price.is_positive())
}
