use axum::{Form, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use storage::dto::account::{AccountResponse, LogInRequest, SignUpRequest};
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::middleware::auth::{expired_session_cookie, session_cookie, session_token};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/sign-up",
    request_body(content = SignUpRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already exists")
    ),
    tag = "accounts"
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Form(req): Form<SignUpRequest>,
) -> WebResult<impl IntoResponse> {
    req.validate()?;

    let user = services::register(state.db.pool(), &req).await?;
    tracing::info!(user_id = user.id, "Account created");

    Ok((StatusCode::CREATED, Json(AccountResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/log-in",
    request_body(content = LogInRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in, session cookie set", body = AccountResponse),
        (status = 401, description = "Wrong username or password")
    ),
    tag = "accounts"
)]
pub async fn log_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(req): Form<LogInRequest>,
) -> WebResult<impl IntoResponse> {
    req.validate()?;

    let user = services::authenticate(state.db.pool(), &req).await?;
    let token =
        services::start_session(state.db.pool(), user.id, state.sessions.ttl_days).await?;

    Ok((
        jar.add(session_cookie(token, &state.sessions)),
        Json(AccountResponse::from(user)),
    ))
}

#[utoipa::path(
    post,
    path = "/log-out",
    responses(
        (status = 204, description = "Session ended")
    ),
    tag = "accounts"
)]
pub async fn log_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> WebResult<impl IntoResponse> {
    if let Some(token) = session_token(&jar) {
        services::end_session(state.db.pool(), token).await?;
    }

    Ok((jar.remove(expired_session_cookie()), StatusCode::NO_CONTENT))
}

#[utoipa::path(
    get,
    path = "/demo",
    responses(
        (status = 200, description = "Logged in as the demo user", body = AccountResponse),
        (status = 404, description = "Demo user not configured or missing")
    ),
    tag = "accounts"
)]
pub async fn demo(State(state): State<AppState>, jar: CookieJar) -> WebResult<impl IntoResponse> {
    let demo_user_id = state.sessions.demo_user_id.ok_or(WebError::NotFound)?;

    let user = services::find_user(state.db.pool(), demo_user_id).await?;
    let token =
        services::start_session(state.db.pool(), user.id, state.sessions.ttl_days).await?;

    Ok((
        jar.add(session_cookie(token, &state.sessions)),
        Json(AccountResponse::from(user)),
    ))
}
