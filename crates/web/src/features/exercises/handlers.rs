use std::collections::HashMap;

use axum::{
    Extension, Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use storage::{
    dto::{
        exercise::{ExerciseCatalogResponse, ExerciseGroupResponse, ExerciseIdQuery, InsertDataPage},
        workout::{InsertSetsForm, InsertSetsResponse, RunForm},
    },
    models::Run,
};

use crate::error::{WebError, WebResult};
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/exercise",
    responses(
        (status = 200, description = "All exercises and weight options", body = ExerciseCatalogResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = [])),
    tag = "exercises"
)]
pub async fn list_exercises(
    State(state): State<AppState>,
) -> WebResult<Json<ExerciseCatalogResponse>> {
    Ok(Json(services::catalog_overview(&state).await?))
}

#[utoipa::path(
    get,
    path = "/exercise/upper",
    responses(
        (status = 200, description = "Upper body exercises", body = ExerciseGroupResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = [])),
    tag = "exercises"
)]
pub async fn list_upper(State(state): State<AppState>) -> WebResult<Json<ExerciseGroupResponse>> {
    Ok(Json(services::exercise_group(&state, true).await?))
}

#[utoipa::path(
    get,
    path = "/exercise/lower",
    responses(
        (status = 200, description = "Lower body exercises", body = ExerciseGroupResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("session_cookie" = [])),
    tag = "exercises"
)]
pub async fn list_lower(State(state): State<AppState>) -> WebResult<Json<ExerciseGroupResponse>> {
    Ok(Json(services::exercise_group(&state, false).await?))
}

#[utoipa::path(
    get,
    path = "/exercise/insert-data",
    params(ExerciseIdQuery),
    responses(
        (status = 200, description = "Data for the set-entry form", body = InsertDataPage),
        (status = 400, description = "Exercise ID missing"),
        (status = 404, description = "Exercise not found")
    ),
    security(("session_cookie" = [])),
    tag = "exercises"
)]
pub async fn insert_data_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ExerciseIdQuery>,
) -> WebResult<Json<InsertDataPage>> {
    let exercise_id = query
        .exercise_id
        .ok_or_else(|| WebError::BadRequest("Exercise ID is required".to_string()))?;

    Ok(Json(
        services::insert_data_page(&state, user.id, exercise_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/exercise/insert-data",
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "exerciseId, sets, isUpperBody and one weight-N/reps-N pair per set"
    ),
    responses(
        (status = 201, description = "Sets logged", body = InsertSetsResponse),
        (status = 400, description = "Malformed form"),
        (status = 404, description = "Unknown exercise or weight")
    ),
    security(("session_cookie" = [])),
    tag = "exercises"
)]
pub async fn insert_data(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(fields): Form<HashMap<String, String>>,
) -> WebResult<impl IntoResponse> {
    let form = InsertSetsForm::from_fields(&fields)?;
    let today = Utc::now().date_naive();

    let ids = services::log_sets(&state, user.id, &form, today).await?;
    tracing::info!(
        user = %user.name,
        exercise_id = form.exercise_id,
        sets = ids.len(),
        "Sets logged"
    );

    Ok((
        StatusCode::CREATED,
        Json(InsertSetsResponse {
            ids,
            is_upper_body: form.is_upper_body,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/exercise/insert-run",
    request_body(content = RunForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Run logged", body = Run),
        (status = 400, description = "Invalid duration or distance")
    ),
    security(("session_cookie" = [])),
    tag = "exercises"
)]
pub async fn insert_run(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<RunForm>,
) -> WebResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let run = services::log_run(&state, user.id, &form, today).await?;

    Ok((StatusCode::CREATED, Json(run)))
}
