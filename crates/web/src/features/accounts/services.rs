use sqlx::PgPool;
use storage::{
    StorageError,
    dto::account::{LogInRequest, SignUpRequest},
    models::User,
    repository::{session::SessionRepository, user::UserRepository},
};

use crate::error::{WebError, WebResult};

const BCRYPT_COST: u32 = 10;

/// Create an account. Hashing runs on the blocking pool.
pub async fn register(pool: &PgPool, request: &SignUpRequest) -> WebResult<User> {
    let password = request.password.clone();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| WebError::InternalServerError(e.to_string()))?
        .map_err(|e| WebError::InternalServerError(e.to_string()))?;

    let repo = UserRepository::new(pool);
    Ok(repo.create(&request.username, &hash).await?)
}

/// Check credentials. Unknown users and wrong passwords are indistinguishable
/// to the caller.
pub async fn authenticate(pool: &PgPool, request: &LogInRequest) -> WebResult<User> {
    let repo = UserRepository::new(pool);

    let user = match repo.find_by_name(&request.username).await {
        Ok(user) => Some(user),
        Err(StorageError::NotFound) => None,
        Err(e) => return Err(e.into()),
    };

    let stored_hash = user.as_ref().map(|user| user.password.clone());
    let matches = verify_password(request.password.clone(), stored_hash).await?;

    match user {
        Some(user) if matches => {
            tracing::info!(user_id = user.id, "Login successful");
            Ok(user)
        }
        Some(user) => {
            tracing::warn!(user_id = user.id, "Login attempt with wrong password");
            Err(WebError::Unauthorized)
        }
        None => {
            tracing::warn!(username = %request.username, "Login attempt for unknown user");
            Err(WebError::Unauthorized)
        }
    }
}

/// Without a stored hash the password is still hashed once at the login cost,
/// so an unknown user takes as long to reject as a wrong password.
async fn verify_password(password: String, stored_hash: Option<String>) -> WebResult<bool> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => bcrypt::verify(password, &hash),
        None => bcrypt::hash(password, BCRYPT_COST).map(|_| false),
    })
    .await
    .map_err(|e| WebError::InternalServerError(e.to_string()))?
    .map_err(|e| WebError::InternalServerError(e.to_string()))
}

pub async fn find_user(pool: &PgPool, id: i32) -> WebResult<User> {
    let repo = UserRepository::new(pool);
    Ok(repo.find_by_id(id).await?)
}

pub async fn start_session(pool: &PgPool, user_id: i32, ttl_days: i32) -> WebResult<String> {
    let repo = SessionRepository::new(pool);
    Ok(repo.create(user_id, ttl_days).await?)
}

pub async fn end_session(pool: &PgPool, token: &str) -> WebResult<()> {
    let repo = SessionRepository::new(pool);
    Ok(repo.delete(token).await?)
}
