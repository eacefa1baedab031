use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::User;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a user from an already hashed password
    pub async fn create(&self, name: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, password)
            VALUES ($1, $2)
            RETURNING id, name, password
            "#,
        )
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_unique_violation() {
                return StorageError::ConstraintViolation("Username already exists".to_string());
            }
            error
        })?;

        Ok(user)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, password FROM users WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(user)
    }
}
