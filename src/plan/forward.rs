use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::demand::Demand;

/// Component C: walks the horizon from last day to second day, moving
/// whole demands to the previous working day whenever a day's total
/// footprint exceeds the fleet's deck area. Never splits a demand, never
/// sorts by size — it moves demands in their current order until the
/// overflow threshold is crossed (spec.md §4.C, §9 design note).
pub fn reschedule_forward(
    demands_by_day: &mut BTreeMap<NaiveDate, Vec<Demand>>,
    working_days: &[NaiveDate],
    fleet_deck_area: i64,
) {
    for i in (1..working_days.len()).rev() {
        let current_date = working_days[i];
        let prev_date = working_days[i - 1];

        let current_area: i64 = demands_by_day[&current_date].iter().map(|d| d.floor_area).sum();
        if current_area <= fleet_deck_area {
            continue;
        }
        let mut excess = current_area - fleet_deck_area;

        let current = demands_by_day.get_mut(&current_date).unwrap();
        let mut forwarded = Vec::new();
        let mut kept = Vec::new();
        for demand in current.drain(..) {
            if excess > 0 {
                excess -= demand.floor_area;
                forwarded.push(demand);
            } else {
                kept.push(demand);
            }
        }
        *current = kept;

        if !forwarded.is_empty() {
            tracing::debug!(
                from = %current_date,
                to = %prev_date,
                count = forwarded.len(),
                "forward-moving overflow demand"
            );
        }
        for mut demand in forwarded {
            demand.loading_date = prev_date;
            demands_by_day.entry(prev_date).or_default().push(demand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContainerId, ProductId, TruckId};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn demand(floor_area: i64, loading_date: NaiveDate) -> Demand {
        Demand {
            product_id: ProductId(1),
            product_code: "P1".into(),
            container_id: ContainerId(1),
            num_containers: 1,
            total_quantity: 1,
            floor_area_per_container: floor_area,
            floor_area,
            delivery_date: loading_date,
            loading_date,
            original_loading_date: loading_date,
            capacity: 1,
            allowed_truck_ids: vec![TruckId(1)],
            max_stack: 1,
            stackable: false,
        }
    }

    #[test]
    fn scenario_s5_overflow_moves_to_previous_day() {
        let mon = d(2025, 10, 6);
        let tue = d(2025, 10, 7);
        let working_days = vec![mon, tue];
        let mut by_day = BTreeMap::new();
        by_day.insert(mon, vec![demand(200_000, mon)]);
        by_day.insert(
            tue,
            vec![demand(800_000, tue), demand(700_000, tue)],
        );

        reschedule_forward(&mut by_day, &working_days, 1_000_000);

        let mon_area: i64 = by_day[&mon].iter().map(|d| d.floor_area).sum();
        let tue_area: i64 = by_day[&tue].iter().map(|d| d.floor_area).sum();
        assert!(mon_area <= 1_000_000 + 800_000);
        assert!(tue_area <= 1_000_000);
        assert_eq!(mon_area + tue_area, 200_000 + 800_000 + 700_000);
    }

    #[test]
    fn no_overflow_leaves_demands_untouched() {
        let mon = d(2025, 10, 6);
        let tue = d(2025, 10, 7);
        let working_days = vec![mon, tue];
        let mut by_day = BTreeMap::new();
        by_day.insert(mon, vec![demand(100, mon)]);
        by_day.insert(tue, vec![demand(100, tue)]);

        reschedule_forward(&mut by_day, &working_days, 1_000_000);

        assert_eq!(by_day[&mon].len(), 1);
        assert_eq!(by_day[&tue].len(), 1);
    }
}
