use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    insert_data, insert_data_page, insert_run, list_exercises, list_lower, list_upper,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises))
        .route("/upper", get(list_upper))
        .route("/lower", get(list_lower))
        .route("/insert-data", get(insert_data_page).post(insert_data))
        .route("/insert-run", post(insert_run))
}
