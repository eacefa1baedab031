use std::sync::Arc;

use storage::Database;
use storage::repository::reference::StaticCatalog;
use storage::repository::workout_log::{BatchMode, WorkoutLogRepository};

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl_days: i32,
    pub secure_cookies: bool,
    pub demo_user_id: Option<i32>,
}

/// Shared by every handler. The catalog is loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Arc<StaticCatalog>,
    pub sessions: SessionSettings,
    pub batch_mode: BatchMode,
}

impl AppState {
    pub fn workout_log(&self) -> WorkoutLogRepository<'_, StaticCatalog> {
        WorkoutLogRepository::new(self.db.pool(), self.catalog.as_ref())
            .with_batch_mode(self.batch_mode)
    }
}
