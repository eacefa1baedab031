use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::StorageError;

static DURATION_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,2}:[0-9]{2}:[0-9]{2}$").expect("duration pattern is valid")
});

const MAX_DISTANCE: Decimal = dec!(999.99);

/// A logged run. `duration` is always rendered as `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Run {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub duration: String,
    pub distance: Decimal,
}

/// Reasons a run submission is rejected. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunValidationError {
    #[error("Invalid duration format. Use HH:MM:SS")]
    DurationFormat,

    #[error("Minutes and seconds must be less than 60")]
    DurationRange,

    #[error("Duration must be greater than 0")]
    ZeroDuration,

    #[error("Invalid distance. Must be between 0.01 and 999.99 miles")]
    DistanceRange,
}

impl From<RunValidationError> for StorageError {
    fn from(error: RunValidationError) -> Self {
        StorageError::Validation(error.to_string())
    }
}

/// A validated run duration.
///
/// Hours are not range-checked beyond the two-digit format, so `25:00:00`
/// is a valid duration.
///
/// # Examples
///
/// ```
/// use storage::models::RunDuration;
///
/// let duration = RunDuration::parse("5:03:07").unwrap();
/// assert_eq!(duration.to_string(), "05:03:07");
/// assert!(RunDuration::parse("00:60:00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDuration {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl RunDuration {
    pub fn parse(input: &str) -> Result<Self, RunValidationError> {
        if !DURATION_FORMAT.is_match(input) {
            return Err(RunValidationError::DurationFormat);
        }

        let mut parts = input
            .split(':')
            .map(|part| part.parse::<u32>().map_err(|_| RunValidationError::DurationFormat));

        let (hours, minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(s)) => (h?, m?, s?),
            _ => return Err(RunValidationError::DurationFormat),
        };

        if minutes >= 60 || seconds >= 60 {
            return Err(RunValidationError::DurationRange);
        }

        if hours == 0 && minutes == 0 && seconds == 0 {
            return Err(RunValidationError::ZeroDuration);
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }
}

impl fmt::Display for RunDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// A run distance in `(0, 999.99]`, kept to two decimal places to match the
/// `NUMERIC(5, 2)` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDistance(Decimal);

impl RunDistance {
    pub fn new(value: Decimal) -> Result<Self, RunValidationError> {
        if value <= Decimal::ZERO || value > MAX_DISTANCE {
            return Err(RunValidationError::DistanceRange);
        }

        // 0.001 passes the range check but would be stored as 0.00
        let rounded = value.round_dp(2);
        if rounded.is_zero() {
            return Err(RunValidationError::DistanceRange);
        }

        Ok(Self(rounded))
    }

    pub fn parse(input: &str) -> Result<Self, RunValidationError> {
        let value =
            Decimal::from_str(input.trim()).map_err(|_| RunValidationError::DistanceRange)?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
