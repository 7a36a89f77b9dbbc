use std::collections::BTreeMap;

use chrono::NaiveDate;

/// A partial function from calendar date to "is this a working day". When
/// no calendar is supplied, every day is a working day (spec.md §3).
pub trait Calendar {
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

/// Every day is a working day.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCalendar;

impl Calendar for NoCalendar {
    fn is_working_day(&self, _date: NaiveDate) -> bool {
        true
    }
}

/// A calendar backed by an explicit date -> is-working-day table. Dates not
/// present default to working, matching `NoCalendar`'s total behavior.
#[derive(Debug, Default, Clone)]
pub struct MapCalendar(pub BTreeMap<NaiveDate, bool>);

impl Calendar for MapCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        self.0.get(&date).copied().unwrap_or(true)
    }
}

impl<T: Calendar + ?Sized> Calendar for &T {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        (**self).is_working_day(date)
    }
}
