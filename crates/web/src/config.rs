use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_ttl_days: i32,
    pub secure_cookies: bool,
    pub demo_user_id: Option<i32>,
    pub atomic_batches: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            session_ttl_days: optional_var("SESSION_TTL_DAYS")?.unwrap_or(30),
            secure_cookies: optional_var("COOKIE_SECURE")?.unwrap_or(false),
            demo_user_id: optional_var("DEMO_USER_ID")?,
            atomic_batches: optional_var("ATOMIC_BATCHES")?.unwrap_or(false),
        })
    }
}

fn optional_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: {value}")),
        _ => Ok(None),
    }
}
