pub mod calendar;
pub mod demand;
pub mod expand;
pub mod forward;
pub mod pack;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{ContainerId, ContainerMap, Map as _, Order, ProductMap, TruckMap};

use calendar::Calendar;
use pack::{pack_day, DailyPlan};

/// Everything the core needs for one run. Borrowed, not owned: the core
/// never mutates its inputs.
pub struct PlanInput<'a> {
    pub start_date: NaiveDate,
    pub days: u32,
    pub orders: &'a [Order],
    pub products: &'a ProductMap,
    pub containers: &'a ContainerMap,
    pub trucks: &'a TruckMap,
    pub calendar: &'a dyn Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub total_orders_in: usize,
    pub total_demands_placed: usize,
    pub total_trips: usize,
    pub use_non_default_trucks: bool,
    pub status: Status,
}

/// A demand that no candidate truck had room for, in whole or in part, by
/// the end of its loading day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnloadedTask {
    pub product_code: String,
    pub container_id: ContainerId,
    pub num_containers: u64,
    pub delivery_date: NaiveDate,
    pub loading_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub period: (NaiveDate, NaiveDate),
    pub working_dates: Vec<NaiveDate>,
    pub daily_plans: BTreeMap<NaiveDate, DailyPlan>,
    pub unloaded_tasks: Vec<UnloadedTask>,
    pub summary: PlanSummary,
}

/// Runs the full four-component pipeline (expand -> place -> forward ->
/// pack) over one horizon. Pure: no I/O, no panics on bad input data —
/// unusable orders are dropped by the Demand Placer and unfulfillable
/// residuals surface as `unloaded_tasks`.
pub fn plan(input: PlanInput) -> Plan {
    let working_days = expand::expand_working_days(input.start_date, input.days, input.calendar);

    let placed = demand::place_demands(
        input.orders,
        input.products,
        input.containers,
        input.trucks,
        input.calendar,
        &working_days,
    );
    let mut by_day = placed.by_day;
    let fleet_deck_area = input.trucks.fleet_deck_area(placed.use_non_default_trucks);

    forward::reschedule_forward(&mut by_day, &working_days, fleet_deck_area);

    let mut daily_plans = BTreeMap::new();
    let mut unloaded_tasks = Vec::new();
    let mut total_demands_placed = 0usize;
    let mut total_trips = 0usize;
    let mut any_warnings = false;

    for date in &working_days {
        let demands = by_day.remove(date).unwrap_or_default();
        let (daily_plan, residuals) =
            pack_day(demands, input.trucks, input.containers, placed.use_non_default_trucks);

        total_demands_placed += daily_plan.trucks.iter().map(|t| t.items.len()).sum::<usize>();
        total_trips += daily_plan.total_trips;
        any_warnings |= !daily_plan.warnings.is_empty();

        for residual in residuals {
            tracing::warn!(
                product = %residual.product_code,
                containers = residual.num_containers,
                loading_date = %residual.loading_date,
                "demand left unloaded"
            );
            unloaded_tasks.push(UnloadedTask {
                product_code: residual.product_code,
                container_id: residual.container_id,
                num_containers: residual.num_containers,
                delivery_date: residual.delivery_date,
                loading_date: residual.loading_date,
            });
        }

        daily_plans.insert(*date, daily_plan);
    }

    let period = (
        working_days.first().copied().unwrap_or(input.start_date),
        working_days.last().copied().unwrap_or(input.start_date),
    );
    let status = if any_warnings || !unloaded_tasks.is_empty() {
        Status::Warning
    } else {
        Status::Normal
    };

    Plan {
        period,
        working_dates: working_days,
        daily_plans,
        unloaded_tasks,
        summary: PlanSummary {
            total_orders_in: input.orders.len(),
            total_demands_placed,
            total_trips,
            use_non_default_trucks: placed.use_non_default_trucks,
            status,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, ContainerId, Order, OrderId, Product, ProductId, Truck, TruckId};
    use calendar::NoCalendar;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fixture() -> (ProductMap, ContainerMap, TruckMap) {
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
            arrival_day_offset: 0,
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
    fn empty_orders_yield_empty_plan() {
        let (products, containers, trucks) = fixture();
        let result = plan(PlanInput {
            start_date: d(2025, 10, 6),
            days: 3,
            orders: &[],
            products: &products,
            containers: &containers,
            trucks: &trucks,
            calendar: &NoCalendar,
        });
        assert_eq!(result.working_dates.len(), 3);
        assert!(result.unloaded_tasks.is_empty());
        assert_eq!(result.summary.total_trips, 0);
        assert_eq!(result.summary.status, Status::Normal);
    }

    #[test]
    fn single_order_end_to_end() {
        let (products, containers, trucks) = fixture();
        let orders = vec![Order {
            id: OrderId("O1".into()),
            product_id: ProductId(1),
            delivery_date: d(2025, 10, 6),
            order_quantity: 200,
        }];
        let result = plan(PlanInput {
            start_date: d(2025, 10, 6),
            days: 1,
            orders: &orders,
            products: &products,
            containers: &containers,
            trucks: &trucks,
            calendar: &NoCalendar,
        });
        assert!(result.unloaded_tasks.is_empty());
        assert_eq!(result.summary.total_trips, 1);
        let day_plan = &result.daily_plans[&d(2025, 10, 6)];
        assert_eq!(day_plan.trucks[0].items[0].num_containers, 20);
    }

    #[test]
    fn oversized_order_reports_residual() {
        let (products, containers, trucks) = fixture();
        let orders = vec![Order {
            id: OrderId("O1".into()),
            product_id: ProductId(1),
            delivery_date: d(2025, 10, 6),
            order_quantity: 1_000_000,
        }];
        let result = plan(PlanInput {
            start_date: d(2025, 10, 6),
            days: 1,
            orders: &orders,
            products: &products,
            containers: &containers,
            trucks: &trucks,
            calendar: &NoCalendar,
        });
        assert!(!result.unloaded_tasks.is_empty());
        assert_eq!(result.summary.status, Status::Warning);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (products, containers, trucks) = fixture();
        let orders = vec![
            Order {
                id: OrderId("O1".into()),
                product_id: ProductId(1),
                delivery_date: d(2025, 10, 8),
                order_quantity: 130,
            },
            Order {
                id: OrderId("O2".into()),
                product_id: ProductId(1),
                delivery_date: d(2025, 10, 6),
                order_quantity: 45,
            },
        ];
        let make = || {
            plan(PlanInput {
                start_date: d(2025, 10, 6),
                days: 5,
                orders: &orders,
                products: &products,
                containers: &containers,
                trucks: &trucks,
                calendar: &NoCalendar,
            })
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn quantity_is_conserved_across_split_and_residual() {
        let (products, containers, trucks) = fixture();
        let orders = vec![Order {
            id: OrderId("O1".into()),
            product_id: ProductId(1),
            delivery_date: d(2025, 10, 6),
            order_quantity: 600,
        }];
        let result = plan(PlanInput {
            start_date: d(2025, 10, 6),
            days: 1,
            orders: &orders,
            products: &products,
            containers: &containers,
            trucks: &trucks,
            calendar: &NoCalendar,
        });
        let loaded: i64 = result
            .daily_plans
            .values()
            .flat_map(|dp| &dp.trucks)
            .flat_map(|t| &t.items)
            .map(|i| i.total_quantity)
            .sum();
        let residual: u64 = result.unloaded_tasks.iter().map(|t| t.num_containers).sum();
        // 50 containers of capacity 10 fit on the single default truck (10000x5000 deck).
        assert_eq!(loaded, 500);
        assert_eq!(residual, 10);
    }
}
