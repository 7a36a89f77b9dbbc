use serde::{Deserialize, Serialize};

use crate::define_map;

use super::ids::{ContainerId, ProductId, TruckId};

/// A product master record. Immutable over a plan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub product_code: String,
    pub capacity: u32,
    pub container_id: ContainerId,
    /// Ordered: earlier entries have higher priority for this product. Empty
    /// means "all `default_use` trucks, in insertion order".
    #[serde(default)]
    pub used_truck_ids: Vec<TruckId>,
}

define_map!(ProductId, Product, ProductMap);
