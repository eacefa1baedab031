use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::{Exercise, RepOption, Run, SetOption, WeightOption};

/// Year, month and day arrive as separate fields. `month` narrows a year view
/// to a month grid, `day` narrows it further to a single date.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EditExerciseQuery {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub exercise_id: i32,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RunIdQuery {
    pub id: i32,
}

/// Activity flags for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_run: bool,
}

/// Distinct activity days in one month. A day with both upper and lower
/// body work counts toward both `upper_days` and `lower_days` but only once
/// toward `total_days`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthActivity {
    pub month: u32,
    pub total_days: i64,
    pub upper_days: i64,
    pub lower_days: i64,
    pub run_days: i64,
}

/// A logged set joined with its exercise and weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct WorkoutEntry {
    pub id: i32,
    pub date: NaiveDate,
    pub exercise_id: i32,
    pub exercise_name: String,
    pub is_upper_body: bool,
    pub weight_id: i32,
    pub weight: i32,
    pub reps: i32,
    pub sets: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum CalendarView {
    Year {
        year: i32,
        active_years: Vec<i32>,
        months: Vec<MonthActivity>,
    },
    Month {
        year: i32,
        month: u32,
        days: Vec<DayActivity>,
    },
    Day {
        date: NaiveDate,
        workouts: Vec<WorkoutEntry>,
        runs: Vec<Run>,
    },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EditExercisePage {
    pub date: NaiveDate,
    pub exercise: Exercise,
    pub entries: Vec<WorkoutEntry>,
    pub weights: Vec<WeightOption>,
    pub reps: Vec<RepOption>,
    pub sets: Vec<SetOption>,
}
