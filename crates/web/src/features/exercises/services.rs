use chrono::NaiveDate;
use storage::{
    dto::{
        exercise::{ExerciseCatalogResponse, ExerciseGroupResponse, InsertDataPage},
        workout::{InsertSetsForm, RunForm},
    },
    error::Result,
    models::Run,
    repository::{calendar::CalendarRepository, reference::ReferenceDataSource},
};

use crate::state::AppState;

/// All exercises and selectable weights
pub async fn catalog_overview(state: &AppState) -> Result<ExerciseCatalogResponse> {
    Ok(ExerciseCatalogResponse {
        exercises: state.catalog.list_exercises().await?,
        weights: state.catalog.list_weight_options().await?,
    })
}

pub async fn exercise_group(state: &AppState, upper_body: bool) -> Result<ExerciseGroupResponse> {
    let (exercise_type, exercises) = if upper_body {
        ("Upper Body", state.catalog.list_upper_body_exercises().await?)
    } else {
        ("Lower Body", state.catalog.list_lower_body_exercises().await?)
    };

    Ok(ExerciseGroupResponse {
        exercise_type: exercise_type.to_string(),
        exercises,
    })
}

/// Exercise, option lists and the user's last session for the set-entry form
pub async fn insert_data_page(
    state: &AppState,
    user_id: i32,
    exercise_id: i32,
) -> Result<InsertDataPage> {
    let exercise = state.catalog.get_exercise_by_id(exercise_id).await?;
    let last_data = CalendarRepository::new(state.db.pool())
        .last_logged_data(exercise_id, user_id)
        .await?;

    Ok(InsertDataPage {
        exercise,
        weights: state.catalog.list_weight_options().await?,
        reps: state.catalog.list_rep_options().await?,
        sets: state.catalog.list_set_options().await?,
        last_data,
    })
}

/// Store one row per submitted set
pub async fn log_sets(
    state: &AppState,
    user_id: i32,
    form: &InsertSetsForm,
    date: NaiveDate,
) -> Result<Vec<i32>> {
    state.catalog.get_exercise_by_id(form.exercise_id).await?;

    state
        .workout_log()
        .insert_logged_sets(user_id, form.exercise_id, form.set_count, &form.entries, date)
        .await
}

pub async fn log_run(state: &AppState, user_id: i32, form: &RunForm, date: NaiveDate) -> Result<Run> {
    state
        .workout_log()
        .insert_run(user_id, &form.duration, &form.distance, date)
        .await
}
