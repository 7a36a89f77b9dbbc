use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{OrderId, ProductId};

/// An outstanding delivery order. Orders with non-positive quantity or an
/// unresolvable product are dropped by the Demand Placer, not here — the
/// core accepts whatever it is given and applies its own filtering so the
/// drop reasons stay in one place (spec.md §3, §4.B).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    pub delivery_date: NaiveDate,
    pub order_quantity: i64,
}
