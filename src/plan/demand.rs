use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{ContainerId, ContainerMap, Map as _, Order, ProductId, ProductMap, TruckId, TruckMap};

use super::calendar::Calendar;

/// A planner-generated record derived from one order. Splitting a demand
/// never mutates it in place: the packer produces a new, smaller `Demand`
/// for the unplaced remainder instead (spec.md §9 re-architecture note).
#[derive(Debug, Clone, Serialize)]
pub struct Demand {
    pub product_id: ProductId,
    pub product_code: String,
    pub container_id: ContainerId,
    pub num_containers: u64,
    pub total_quantity: i64,
    pub floor_area_per_container: i64,
    pub floor_area: i64,
    pub delivery_date: NaiveDate,
    pub loading_date: NaiveDate,
    /// `delivery_date - arrival_day_offset`, before working-day rollback or
    /// any Forward Scheduler move. Used to populate `is_advanced`/
    /// `original_date` on the output side (spec.md §6).
    pub original_loading_date: NaiveDate,
    pub capacity: u32,
    pub allowed_truck_ids: Vec<TruckId>,
    pub max_stack: u32,
    pub stackable: bool,
}

impl Demand {
    pub fn is_advanced(&self) -> bool {
        self.loading_date != self.original_loading_date
    }
}

const MAX_ROLLBACK_DAYS: i64 = 7;

/// Demands grouped by loading day, in working-day order, plus the
/// horizon-wide decision of whether non-default trucks are enabled.
pub struct PlacedDemands {
    pub by_day: BTreeMap<NaiveDate, Vec<Demand>>,
    pub use_non_default_trucks: bool,
}

/// Component B: turns filtered orders into per-day demand lists (spec.md
/// §4.B). Bad inputs are silently dropped; drop reasons are not reported
/// (spec.md §7 "Drop" taxonomy).
pub fn place_demands(
    orders: &[Order],
    products: &ProductMap,
    containers: &ContainerMap,
    trucks: &TruckMap,
    calendar: &dyn Calendar,
    working_days: &[NaiveDate],
) -> PlacedDemands {
    let mut by_day: BTreeMap<NaiveDate, Vec<Demand>> =
        working_days.iter().map(|d| (*d, Vec::new())).collect();

    let default_truck_ids = trucks.default_truck_ids();
    let mut total_floor_area: i64 = 0;

    for order in orders {
        if order.order_quantity <= 0 {
            tracing::debug!(order_id = %order.id, "dropping order: non-positive quantity");
            continue;
        }
        let Some(product) = products.get(&order.product_id) else {
            tracing::debug!(order_id = %order.id, product_id = ?order.product_id, "dropping order: unknown product");
            continue;
        };
        let Some(container) = containers.get(&product.container_id) else {
            tracing::debug!(order_id = %order.id, "dropping order: unknown container");
            continue;
        };

        let capacity = product.capacity.max(1) as i64;
        let num_containers = crate::model::container::div_ceil_u64(
            order.order_quantity.max(0) as u64,
            capacity as u64,
        );

        let allowed_truck_ids = if product.used_truck_ids.is_empty() {
            default_truck_ids.clone()
        } else {
            product.used_truck_ids.clone()
        };

        let Some(&first_truck_id) = allowed_truck_ids.first() else {
            tracing::debug!(order_id = %order.id, "dropping order: no permitted truck");
            continue;
        };
        let Some(first_truck) = trucks.get(&first_truck_id) else {
            tracing::debug!(order_id = %order.id, truck_id = %first_truck_id, "dropping order: permitted truck unknown");
            continue;
        };

        let due_minus_offset = order.delivery_date - chrono::Duration::days(first_truck.arrival_day_offset);
        let Some(loading_date) = roll_back_to_working_day(due_minus_offset, calendar) else {
            tracing::debug!(order_id = %order.id, "dropping order: no working day within rollback window");
            continue;
        };

        if !by_day.contains_key(&loading_date) {
            tracing::debug!(order_id = %order.id, loading_date = %loading_date, "dropping order: loading date outside horizon");
            continue;
        }

        let floor_area_per_container = container.footprint();
        let floor_area = container.stacked_floor_area(num_containers);
        total_floor_area += floor_area;

        let demand = Demand {
            product_id: product.id,
            product_code: product.product_code.clone(),
            container_id: container.id,
            num_containers,
            total_quantity: order.order_quantity,
            floor_area_per_container,
            floor_area,
            delivery_date: order.delivery_date,
            loading_date,
            original_loading_date: due_minus_offset,
            capacity: product.capacity.max(1),
            allowed_truck_ids,
            max_stack: container.effective_max_stack(),
            stackable: container.stackable,
        };

        by_day.entry(loading_date).or_default().push(demand);
    }

    let horizon_days = working_days.len().max(1) as f64;
    let avg_floor_area = total_floor_area as f64 / horizon_days;
    let default_deck_area = trucks.default_deck_area() as f64;
    let use_non_default_trucks = avg_floor_area > default_deck_area;

    PlacedDemands {
        by_day,
        use_non_default_trucks,
    }
}

/// Rolls `date` back to the most recent working day, searching at most
/// `MAX_ROLLBACK_DAYS` days. Returns `None` if none is found in that window.
fn roll_back_to_working_day(date: NaiveDate, calendar: &dyn Calendar) -> Option<NaiveDate> {
    let mut candidate = date;
    for _ in 0..=MAX_ROLLBACK_DAYS {
        if calendar.is_working_day(candidate) {
            return Some(candidate);
        }
        candidate -= chrono::Duration::days(1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, OrderId, Product, Truck};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn single_truck_fixture(offset: i64) -> (ProductMap, ContainerMap, TruckMap) {
        let container = Container {
            id: ContainerId(1),
            width: 1000,
            depth: 1000,
            height: 1000,
            max_weight: 500,
            stackable: false,
            max_stack: 1,
        };
        let truck = Truck {
            id: TruckId(1),
            name: "T1".into(),
            width: 10000,
            depth: 5000,
            height: 2000,
            max_weight: 10_000,
            default_use: true,
            arrival_day_offset: offset,
            priority_products: vec![],
            departure_time: None,
            arrival_time: None,
        };
        let product = Product {
            id: ProductId(1),
            product_code: "P1".into(),
            capacity: 10,
            container_id: ContainerId(1),
            used_truck_ids: vec![TruckId(1)],
        };
        (
            [(product.id, product)].into_iter().collect(),
            [(container.id, container)].into_iter().collect(),
            [(truck.id, truck)].into_iter().collect(),
        )
    }

    #[test]
    fn scenario_s1_single_truck_no_stacking() {
        let (products, containers, trucks) = single_truck_fixture(0);
        let order = Order {
            id: OrderId("O1".into()),
            product_id: ProductId(1),
            delivery_date: d(2025, 10, 6),
            order_quantity: 200,
        };
        let working_days = vec![d(2025, 10, 6)];
        let placed = place_demands(
            &[order],
            &products,
            &containers,
            &trucks,
            &crate::plan::calendar::NoCalendar,
            &working_days,
        );
        let demands = &placed.by_day[&d(2025, 10, 6)];
        assert_eq!(demands.len(), 1);
        assert_eq!(demands[0].num_containers, 20);
        assert_eq!(demands[0].floor_area, 20 * 1_000_000);
        assert!(!placed.use_non_default_trucks);
    }

    #[test]
    fn scenario_s3_offset_moves_loading_day() {
        let (products, containers, trucks) = single_truck_fixture(1);
        let order = Order {
            id: OrderId("O1".into()),
            product_id: ProductId(1),
            delivery_date: d(2025, 10, 7),
            order_quantity: 10,
        };
        let working_days = vec![d(2025, 10, 6), d(2025, 10, 7)];
        let placed = place_demands(
            &[order],
            &products,
            &containers,
            &trucks,
            &crate::plan::calendar::NoCalendar,
            &working_days,
        );
        assert_eq!(placed.by_day[&d(2025, 10, 6)].len(), 1);
        assert!(placed.by_day[&d(2025, 10, 7)].is_empty());
    }

    #[test]
    fn scenario_s4_non_working_day_rollback() {
        let (products, containers, trucks) = single_truck_fixture(0);
        let mut cal = crate::plan::calendar::MapCalendar::default();
        cal.0.insert(d(2025, 10, 6), false);
        let order = Order {
            id: OrderId("O1".into()),
            product_id: ProductId(1),
            delivery_date: d(2025, 10, 6),
            order_quantity: 10,
        };
        let working_days = vec![d(2025, 10, 3), d(2025, 10, 7)];
        let placed = place_demands(&[order], &products, &containers, &trucks, &cal, &working_days);
        assert_eq!(placed.by_day[&d(2025, 10, 3)].len(), 1);
    }

    #[test]
    fn drops_order_with_non_positive_quantity() {
        let (products, containers, trucks) = single_truck_fixture(0);
        let order = Order {
            id: OrderId("O1".into()),
            product_id: ProductId(1),
            delivery_date: d(2025, 10, 6),
            order_quantity: 0,
        };
        let working_days = vec![d(2025, 10, 6)];
        let placed = place_demands(
            &[order],
            &products,
            &containers,
            &trucks,
            &crate::plan::calendar::NoCalendar,
            &working_days,
        );
        assert!(placed.by_day[&d(2025, 10, 6)].is_empty());
    }
}
