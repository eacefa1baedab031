use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    calendar, delete_exercise, delete_run, edit_exercise, edit_exercise_page, edit_run,
    edit_run_page,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(calendar))
        .route("/edit", get(edit_exercise_page).post(edit_exercise))
        .route("/delete", post(delete_exercise))
        .route("/edit-run", get(edit_run_page).post(edit_run))
        .route("/delete-run", post(delete_run))
}
