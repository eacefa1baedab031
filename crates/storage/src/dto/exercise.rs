use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::dto::calendar::WorkoutEntry;
use crate::models::{Exercise, RepOption, SetOption, WeightOption};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExerciseIdQuery {
    pub exercise_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseCatalogResponse {
    pub exercises: Vec<Exercise>,
    pub weights: Vec<WeightOption>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseGroupResponse {
    pub exercise_type: String,
    pub exercises: Vec<Exercise>,
}

/// Everything the set-entry form needs: the exercise, the option lists and
/// the numbers from the user's most recent session of that exercise.
#[derive(Debug, Serialize, ToSchema)]
pub struct InsertDataPage {
    pub exercise: Exercise,
    pub weights: Vec<WeightOption>,
    pub reps: Vec<RepOption>,
    pub sets: Vec<SetOption>,
    pub last_data: Vec<WorkoutEntry>,
}
