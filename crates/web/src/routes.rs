use axum::{Router, middleware};

use crate::features::{accounts, calendar, exercises};
use crate::middleware::auth::require_user;
use crate::state::AppState;

/// Account routes are public; everything under `/exercise` and `/calendar`
/// needs a live session.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/exercise", exercises::routes::routes())
        .nest("/calendar", calendar::routes::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .merge(accounts::routes::routes())
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use sqlx::postgres::PgPoolOptions;
    use storage::{Database, repository::reference::StaticCatalog, repository::workout_log::BatchMode};
    use tower::ServiceExt;

    use super::*;
    use crate::state::SessionSettings;

    fn offline_state() -> AppState {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://nobody@127.0.0.1:1/unreachable")
            .unwrap();

        AppState {
            db: Database::from_pool(pool),
            catalog: Arc::new(StaticCatalog::default()),
            sessions: SessionSettings {
                ttl_days: 30,
                secure_cookies: false,
                demo_user_id: None,
            },
            batch_mode: BatchMode::Sequential,
        }
    }

    #[tokio::test]
    async fn test_protected_routes_require_session_cookie() {
        for uri in ["/exercise", "/exercise/upper", "/calendar", "/calendar/edit-run?id=1"] {
            let response = router(offline_state())
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_demo_without_configured_user_is_not_found() {
        let response = router(offline_state())
            .oneshot(Request::get("/demo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_log_out_without_session_succeeds() {
        let response = router(offline_state())
            .oneshot(Request::post("/log-out").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_short_sign_up_password_is_rejected() {
        let response = router(offline_state())
            .oneshot(
                Request::post("/sign-up")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=lifter&password=short"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
