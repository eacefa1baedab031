use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use storage::repository::session::SessionRepository;

use crate::error::WebError;
use crate::state::{AppState, SessionSettings};

pub const SESSION_COOKIE: &str = "sid";

/// The authenticated user, inserted into request extensions by [`require_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub name: String,
}

/// Reject the request with 401 unless the session cookie names a live session.
pub async fn require_user(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = session_token(&jar).ok_or(WebError::Unauthorized)?;

    let user = SessionRepository::new(state.db.pool())
        .find_user(token)
        .await?
        .ok_or(WebError::Unauthorized)?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        name: user.name,
    });

    Ok(next.run(request).await)
}

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: String, settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure_cookies)
        .max_age(time::Duration::days(i64::from(settings.ttl_days)))
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SessionSettings {
        SessionSettings {
            ttl_days: 30,
            secure_cookies: true,
            demo_user_id: None,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), &settings());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[test]
    fn test_session_token_reads_jar() {
        let jar = CookieJar::new();
        assert_eq!(session_token(&jar), None);

        let jar = jar.add(session_cookie("abc".to_string(), &settings()));
        assert_eq!(session_token(&jar), Some("abc"));

        let jar = jar.remove(expired_session_cookie());
        assert_eq!(session_token(&jar), None);
    }
}
