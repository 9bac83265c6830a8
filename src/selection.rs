//! Automatic pre-selection of report orders awaiting delivery.

use crate::domain::report::ReportOrder;
use crate::domain::types::OrderId;

/// Picks the first `n` orders on the page that are not yet delivered,
/// preserving page order.
pub fn select_first_n(orders: &[ReportOrder], n: usize) -> Vec<OrderId> {
    orders
        .iter()
        .filter(|order| !order.is_delivered())
        .take(n)
        .map(|order| order.id.clone())
        .collect()
}
