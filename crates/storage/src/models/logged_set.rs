use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One weight/reps combination a user performed for an exercise on a date.
///
/// `sets` is the set count submitted with the batch; every row of the batch
/// carries the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoggedSet {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub exercise_id: i32,
    pub weight_id: i32,
    pub reps: i32,
    pub sets: i32,
}
