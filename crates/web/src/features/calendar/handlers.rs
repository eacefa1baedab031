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
        calendar::{CalendarQuery, CalendarView, EditExercisePage, EditExerciseQuery, RunIdQuery},
        workout::{DeleteRunForm, DeleteSetsForm, EditRunForm, EditSetsForm},
    },
    models::{LoggedSet, Run},
};

use crate::error::WebResult;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Year, month or day view", body = CalendarView),
        (status = 400, description = "Invalid date")
    ),
    security(("session_cookie" = [])),
    tag = "calendar"
)]
pub async fn calendar(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<CalendarQuery>,
) -> WebResult<Json<CalendarView>> {
    let today = Utc::now().date_naive();

    Ok(Json(
        services::calendar_view(&state, user.id, &query, today).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/calendar/edit",
    params(EditExerciseQuery),
    responses(
        (status = 200, description = "Sets of one exercise on one date", body = EditExercisePage),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Exercise not found")
    ),
    security(("session_cookie" = [])),
    tag = "calendar"
)]
pub async fn edit_exercise_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<EditExerciseQuery>,
) -> WebResult<Json<EditExercisePage>> {
    Ok(Json(
        services::edit_exercise_page(&state, user.id, &query).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/calendar/edit",
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "One id-N/weight-N/reps-N/sets-N group per edited row"
    ),
    responses(
        (status = 200, description = "Updated rows", body = Vec<LoggedSet>),
        (status = 400, description = "Malformed form"),
        (status = 404, description = "Row or weight not found")
    ),
    security(("session_cookie" = [])),
    tag = "calendar"
)]
pub async fn edit_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(fields): Form<HashMap<String, String>>,
) -> WebResult<Json<Vec<LoggedSet>>> {
    let form = EditSetsForm::from_fields(&fields)?;
    let updated = services::update_sets(&state, user.id, &form).await?;
    tracing::info!(user_id = user.id, rows = updated.len(), "Sets updated");

    Ok(Json(updated))
}

#[utoipa::path(
    post,
    path = "/calendar/delete",
    request_body(
        content = DeleteSetsForm,
        content_type = "application/x-www-form-urlencoded",
        description = "Repeated id fields"
    ),
    responses(
        (status = 204, description = "Rows deleted")
    ),
    security(("session_cookie" = [])),
    tag = "calendar"
)]
pub async fn delete_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    axum_extra::extract::Form(form): axum_extra::extract::Form<DeleteSetsForm>,
) -> WebResult<impl IntoResponse> {
    services::delete_sets(&state, user.id, &form.ids).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/calendar/edit-run",
    params(RunIdQuery),
    responses(
        (status = 200, description = "Run to edit", body = Run),
        (status = 404, description = "Run not found")
    ),
    security(("session_cookie" = [])),
    tag = "calendar"
)]
pub async fn edit_run_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<RunIdQuery>,
) -> WebResult<Json<Run>> {
    Ok(Json(services::find_run(&state, user.id, query.id).await?))
}

#[utoipa::path(
    post,
    path = "/calendar/edit-run",
    request_body(content = EditRunForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Updated run", body = Run),
        (status = 400, description = "Invalid duration or distance"),
        (status = 404, description = "Run not found")
    ),
    security(("session_cookie" = [])),
    tag = "calendar"
)]
pub async fn edit_run(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<EditRunForm>,
) -> WebResult<Json<Run>> {
    Ok(Json(services::update_run(&state, user.id, &form).await?))
}

#[utoipa::path(
    post,
    path = "/calendar/delete-run",
    request_body(content = DeleteRunForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 204, description = "Run deleted")
    ),
    security(("session_cookie" = [])),
    tag = "calendar"
)]
pub async fn delete_run(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<DeleteRunForm>,
) -> WebResult<impl IntoResponse> {
    services::delete_run(&state, user.id, form.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
