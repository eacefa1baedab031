use rand::RngCore;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::User;

/// Login sessions, stored server side and referenced by an opaque token.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Start a session for `user_id` and return its token. Expired sessions
    /// are purged first.
    pub async fn create(&self, user_id: i32, ttl_days: i32) -> Result<String> {
        self.purge_expired().await?;

        let token = generate_token();

        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, now() + make_interval(days => $3))
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(ttl_days)
        .execute(self.pool)
        .await?;

        Ok(token)
    }

    /// The user behind an unexpired session, if any.
    pub async fn find_user(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.password
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Remove every session past its expiry and return how many went.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(purged = result.rows_affected(), "Expired sessions removed");
        }

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

/// 32 random bytes, hex encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
