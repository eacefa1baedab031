use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{demo, log_in, log_out, sign_up};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/log-in", post(log_in))
        .route("/log-out", post(log_out))
        .route("/demo", get(demo))
}
