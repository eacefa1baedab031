use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    /// bcrypt hash, never serialized
    #[serde(skip)]
    pub password: String,
}
