use chrono::NaiveDate;

use super::calendar::Calendar;

/// Walks days forward from `start`, collecting the first `days` that the
/// calendar reports as working days. Non-working days consume no slot.
/// Total: never fails, no bound on lookahead distance (spec.md §4.A).
pub fn expand_working_days(start: NaiveDate, days: u32, calendar: &dyn Calendar) -> Vec<NaiveDate> {
    let mut working_days = Vec::with_capacity(days as usize);
    let mut current = start;
    while (working_days.len() as u32) < days {
        if calendar.is_working_day(current) {
            working_days.push(current);
        }
        current = current
            .succ_opt()
            .expect("NaiveDate exhausted while expanding working days");
    }
    working_days
}
