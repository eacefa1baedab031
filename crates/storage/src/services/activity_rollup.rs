use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::dto::calendar::{DayActivity, MonthActivity};

/// Roll per-day activity flags up into per-month counts.
///
/// Only months that contain at least one activity day are returned, in
/// ascending order. Repeated dates are merged first so a date is never
/// counted twice.
pub fn summarize_months(days: &[DayActivity]) -> Vec<MonthActivity> {
    let mut merged: BTreeMap<NaiveDate, DayActivity> = BTreeMap::new();
    for day in days {
        merged
            .entry(day.date)
            .and_modify(|existing| {
                existing.has_upper |= day.has_upper;
                existing.has_lower |= day.has_lower;
                existing.has_run |= day.has_run;
            })
            .or_insert(*day);
    }

    let mut months: BTreeMap<u32, MonthActivity> = BTreeMap::new();
    for day in merged.values() {
        let month = months.entry(day.date.month()).or_insert(MonthActivity {
            month: day.date.month(),
            ..MonthActivity::default()
        });

        month.total_days += 1;
        month.upper_days += i64::from(day.has_upper);
        month.lower_days += i64::from(day.has_lower);
        month.run_days += i64::from(day.has_run);
    }

    months.into_values().collect()
}
