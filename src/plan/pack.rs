use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{
    container::div_ceil_u64, ContainerId, ContainerMap, Map as _, ProductId, Truck, TruckId,
    TruckMap,
};

use super::demand::Demand;

/// A demand (possibly split) assigned to a specific truck on a specific day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedItem {
    pub product_id: ProductId,
    pub product_code: String,
    pub container_id: ContainerId,
    pub num_containers: u64,
    pub total_quantity: i64,
    pub delivery_date: NaiveDate,
    pub loading_date: NaiveDate,
    pub truck_id: TruckId,
    pub truck_name: String,
    pub is_advanced: bool,
    pub original_date: Option<NaiveDate>,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
}

/// At most one per (day, truck). Invariant: the sum of stacked footprints
/// over `items`, grouped by container id, never exceeds `deck_area`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruckTrip {
    pub truck_id: TruckId,
    pub truck_name: String,
    pub items: Vec<LoadedItem>,
    pub deck_area: i64,
    pub utilization: f64,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyPlan {
    pub trucks: Vec<TruckTrip>,
    pub total_trips: usize,
    pub warnings: Vec<String>,
}

struct TruckState<'a> {
    truck: &'a Truck,
    remaining_area: i64,
    items: Vec<(Demand, TruckId)>,
    loaded_container_counts: BTreeMap<ContainerId, u64>,
}

impl<'a> TruckState<'a> {
    fn new(truck: &'a Truck) -> Self {
        Self {
            truck,
            remaining_area: truck.deck_area(),
            items: Vec::new(),
            loaded_container_counts: BTreeMap::new(),
        }
    }
}

/// Component D: assigns one working day's demands to trucks (spec.md §4.D).
/// Never fails; demands that exhaust all candidate trucks become part of
/// the returned residual list.
pub fn pack_day(
    demands: Vec<Demand>,
    trucks: &TruckMap,
    containers: &ContainerMap,
    use_non_default_trucks: bool,
) -> (DailyPlan, Vec<Demand>) {
    let available_truck_ids: Vec<TruckId> = trucks
        .iter()
        .filter(|(_, t)| use_non_default_trucks || t.default_use)
        .map(|(id, _)| *id)
        .collect();

    let mut states: BTreeMap<TruckId, TruckState> = available_truck_ids
        .iter()
        .map(|id| (*id, TruckState::new(trucks.gets(id))))
        .collect();

    let mut warnings = Vec::new();
    let mut residuals = Vec::new();

    for demand in sort_demands(demands, trucks) {
        place_demand(demand, trucks, containers, &available_truck_ids, &mut states, &mut warnings, &mut residuals);
    }

    let mut trips: Vec<TruckTrip> = Vec::new();
    for truck_id in &available_truck_ids {
        let state = states.remove(truck_id).unwrap();
        if state.items.is_empty() {
            continue;
        }
        trips.push(build_trip(state, containers));
    }

    let total_trips = trips.len();
    (
        DailyPlan {
            trucks: trips,
            total_trips,
            warnings,
        },
        residuals,
    )
}

/// Composite sort key for a day's demands (spec.md §4.D "Demand ordering").
fn sort_demands(mut demands: Vec<Demand>, trucks: &TruckMap) -> Vec<Demand> {
    demands.sort_by(|a, b| demand_sort_key(a, trucks).cmp(&demand_sort_key(b, trucks)));
    demands
}

fn demand_sort_key(demand: &Demand, trucks: &TruckMap) -> (u8, i32, String) {
    let priority_truck = trucks
        .values()
        .filter(|t| t.carries_priority(&demand.product_code))
        .map(|t| t.id.0)
        .min();

    if let Some(truck_id) = priority_truck {
        return (0, truck_id, demand.product_code.clone());
    }
    if let Some(first) = demand.allowed_truck_ids.first() {
        return (1, first.0, demand.product_code.clone());
    }
    (2, i32::MAX, demand.product_code.clone())
}

#[allow(clippy::too_many_arguments)]
fn place_demand(
    demand: Demand,
    trucks: &TruckMap,
    containers: &ContainerMap,
    available_truck_ids: &[TruckId],
    states: &mut BTreeMap<TruckId, TruckState>,
    warnings: &mut Vec<String>,
    residuals: &mut Vec<Demand>,
) {
    let candidates: Vec<TruckId> = if demand.allowed_truck_ids.is_empty() {
        available_truck_ids.to_vec()
    } else {
        demand
            .allowed_truck_ids
            .iter()
            .copied()
            .filter(|id| available_truck_ids.contains(id))
            .collect()
    };

    if candidates.is_empty() {
        if !demand.allowed_truck_ids.is_empty() {
            warnings.push(format!(
                "truck constraint {:?} unavailable for {}",
                demand.allowed_truck_ids.iter().map(|t| t.0).collect::<Vec<_>>(),
                demand.product_code
            ));
        }
        residuals.push(demand);
        return;
    }

    let mut sorted_candidates = candidates;
    sorted_candidates.sort_by_key(|id| {
        let state = &states[id];
        let class_a = !state.truck.carries_priority(&demand.product_code);
        let class_b = !state.loaded_container_counts.contains_key(&demand.container_id);
        (class_a, class_b, Reverse(state.remaining_area))
    });

    let mut residual = demand;
    let mut continuation = false;

    for truck_id in sorted_candidates {
        if residual.num_containers == 0 {
            break;
        }
        let container = containers.gets(&residual.container_id);
        let state = states.get_mut(&truck_id).unwrap();

        // (a) stack consolidation. Skipped once this demand has already been
        // split onto an earlier truck this call: a continuation placement
        // only ever does a full or split placement, never consolidation.
        if residual.stackable && !continuation {
            if let Some(&existing) = state.loaded_container_counts.get(&residual.container_id) {
                let new_total = existing + residual.num_containers;
                let additional_stacks = div_ceil_u64(new_total, residual.max_stack as u64)
                    - div_ceil_u64(existing, residual.max_stack as u64);
                let additional_area = additional_stacks as i64 * residual.floor_area_per_container;
                if additional_area <= state.remaining_area {
                    state.remaining_area -= additional_area;
                    *state.loaded_container_counts.get_mut(&residual.container_id).unwrap() +=
                        residual.num_containers;
                    state.items.push((residual.clone(), truck_id));
                    residual.num_containers = 0;
                    continue;
                }
            }
        }

        // (b) full placement.
        if residual.floor_area <= state.remaining_area {
            state.remaining_area -= residual.floor_area;
            *state
                .loaded_container_counts
                .entry(residual.container_id)
                .or_insert(0) += residual.num_containers;
            state.items.push((residual.clone(), truck_id));
            residual.num_containers = 0;
            continue;
        }

        // (c) split placement.
        let loadable_containers = if residual.stackable {
            let max_stacks_that_fit = state.remaining_area / residual.floor_area_per_container;
            (max_stacks_that_fit * residual.max_stack as i64).max(0) as u64
        } else {
            (state.remaining_area / residual.floor_area_per_container).max(0) as u64
        };

        if loadable_containers > 0 && loadable_containers < residual.num_containers {
            let placed_quantity = loadable_containers as i64 * residual.capacity as i64;
            let placed_floor_area = container.stacked_floor_area(loadable_containers);

            let mut placed_part = residual.clone();
            placed_part.num_containers = loadable_containers;
            placed_part.total_quantity = placed_quantity;
            placed_part.floor_area = placed_floor_area;

            state.remaining_area -= placed_floor_area;
            *state
                .loaded_container_counts
                .entry(residual.container_id)
                .or_insert(0) += loadable_containers;
            state.items.push((placed_part, truck_id));

            residual.num_containers -= loadable_containers;
            residual.total_quantity -= placed_quantity;
            residual.floor_area = container.stacked_floor_area(residual.num_containers);
            continuation = true;
        }
        // no placement possible on this truck: fall through to the next candidate.
    }

    if residual.num_containers > 0 {
        warnings.push(format!(
            "unloadable residual: {} ({} containers)",
            residual.product_code, residual.num_containers
        ));
        residuals.push(residual);
    }
}

fn build_trip(state: TruckState, containers: &ContainerMap) -> TruckTrip {
    let deck_area = state.truck.deck_area();

    let mut counts_by_container: BTreeMap<ContainerId, u64> = BTreeMap::new();
    for (demand, _) in &state.items {
        *counts_by_container.entry(demand.container_id).or_insert(0) += demand.num_containers;
    }
    let loaded_area: i64 = counts_by_container
        .iter()
        .map(|(container_id, count)| {
            let container = containers.gets(container_id);
            container.stacked_floor_area(*count)
        })
        .sum();

    let total_volume: i64 = state
        .items
        .iter()
        .map(|(d, _)| {
            let c = containers.gets(&d.container_id);
            c.width * c.depth * c.height * d.num_containers as i64
        })
        .sum();
    let total_weight: i64 = state
        .items
        .iter()
        .map(|(d, _)| {
            let c = containers.gets(&d.container_id);
            c.max_weight * d.num_containers as i64
        })
        .sum();

    let utilization = percent(loaded_area, deck_area);
    let volume_utilization = percent(total_volume, state.truck.deck_volume());
    let weight_utilization = percent(total_weight, state.truck.max_weight);

    let items = state
        .items
        .into_iter()
        .map(|(demand, truck_id)| LoadedItem {
            product_id: demand.product_id,
            product_code: demand.product_code,
            container_id: demand.container_id,
            num_containers: demand.num_containers,
            total_quantity: demand.total_quantity,
            delivery_date: demand.delivery_date,
            loading_date: demand.loading_date,
            truck_id,
            truck_name: state.truck.name.clone(),
            is_advanced: demand.loading_date != demand.original_loading_date,
            original_date: (demand.loading_date != demand.original_loading_date)
                .then_some(demand.original_loading_date),
            volume_utilization,
            weight_utilization,
        })
        .collect();

    TruckTrip {
        truck_id: state.truck.id,
        truck_name: state.truck.name.clone(),
        items,
        deck_area,
        utilization,
        volume_utilization,
        weight_utilization,
    }
}

fn percent(used: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 1000.0).round() / 10.0
}
