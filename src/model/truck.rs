use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::define_map;

use super::ids::TruckId;

/// A truck in the fleet. Immutable over a plan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    pub id: TruckId,
    pub name: String,
    pub width: i64,
    pub depth: i64,
    pub height: i64,
    pub max_weight: i64,
    pub default_use: bool,
    pub arrival_day_offset: i64,
    /// Product codes this truck preferentially carries, in no particular
    /// priority order among themselves — membership is what matters.
    #[serde(default)]
    pub priority_products: Vec<String>,
    /// Informational only; the core never schedules around these.
    pub departure_time: Option<NaiveTime>,
    pub arrival_time: Option<NaiveTime>,
}

impl Truck {
    pub fn deck_area(&self) -> i64 {
        self.width * self.depth
    }

    pub fn deck_volume(&self) -> i64 {
        self.width * self.depth * self.height
    }

    pub fn carries_priority(&self, product_code: &str) -> bool {
        self.priority_products.iter().any(|p| p == product_code)
    }
}

define_map!(TruckId, Truck, TruckMap);

impl TruckMap {
    /// Default-fleet truck ids, in ascending id order (the map's natural
    /// iteration order, since it is `BTreeMap`-backed).
    pub fn default_truck_ids(&self) -> Vec<TruckId> {
        use super::Map as _;
        self.iter()
            .filter(|(_, t)| t.default_use)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn default_deck_area(&self) -> i64 {
        use super::Map as _;
        self.values().filter(|t| t.default_use).map(|t| t.deck_area()).sum()
    }

    pub fn fleet_deck_area(&self, use_non_default: bool) -> i64 {
        use super::Map as _;
        self.values()
            .filter(|t| use_non_default || t.default_use)
            .map(|t| t.deck_area())
            .sum()
    }
}
