use chrono::NaiveDate;

use crate::error::{Result, StorageError};

/// Combine separately submitted year/month/day fields into a calendar date.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| StorageError::Validation(format!("Invalid date: {year}-{month}-{day}")))
}

/// Half-open `[start, end)` range covering a whole year.
pub fn year_range(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = calendar_date(year, 1, 1)?;
    let end = calendar_date(year + 1, 1, 1)?;
    Ok((start, end))
}

/// Half-open `[start, end)` range covering one month.
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(StorageError::Validation(format!(
            "Month must be between 1 and 12, got {month}"
        )));
    }

    let start = calendar_date(year, month, 1)?;
    let end = if month == 12 {
        calendar_date(year + 1, 1, 1)?
    } else {
        calendar_date(year, month + 1, 1)?
    };

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_date_rejects_impossible_days() {
        assert_eq!(calendar_date(2026, 3, 15).unwrap(), date(2026, 3, 15));
        assert!(calendar_date(2026, 2, 29).is_err());
        assert!(calendar_date(2024, 2, 29).is_ok());
        assert!(calendar_date(2026, 4, 31).is_err());
        assert!(calendar_date(2026, 13, 1).is_err());
        assert!(calendar_date(2026, 1, 0).is_err());
    }

    #[test]
    fn test_month_range_rolls_over_december() {
        assert_eq!(
            month_range(2026, 12).unwrap(),
            (date(2026, 12, 1), date(2027, 1, 1))
        );
        assert_eq!(
            month_range(2026, 2).unwrap(),
            (date(2026, 2, 1), date(2026, 3, 1))
        );
        assert!(month_range(2026, 0).is_err());
        assert!(month_range(2026, 13).is_err());
    }

    #[test]
    fn test_year_range() {
        assert_eq!(
            year_range(2026).unwrap(),
            (date(2026, 1, 1), date(2027, 1, 1))
        );
    }
}
