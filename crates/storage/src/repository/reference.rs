use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::{Exercise, RepOption, SetOption, WeightOption};

/// Read-only access to the exercise and option catalogs.
///
/// The catalogs are seeded out of band and do not change while the
/// application runs.
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    async fn list_exercises(&self) -> Result<Vec<Exercise>>;

    async fn list_upper_body_exercises(&self) -> Result<Vec<Exercise>>;

    async fn list_lower_body_exercises(&self) -> Result<Vec<Exercise>>;

    async fn get_exercise_by_id(&self, id: i32) -> Result<Exercise>;

    async fn list_weight_options(&self) -> Result<Vec<WeightOption>>;

    async fn list_rep_options(&self) -> Result<Vec<RepOption>>;

    async fn list_set_options(&self) -> Result<Vec<SetOption>>;

    /// Exact match only; an unknown weight is `NotFound`, never the nearest option.
    async fn resolve_weight_id(&self, weight: i32) -> Result<i32>;
}

/// Catalog lookups against Postgres
pub struct ReferenceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReferenceRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn exercises_where(&self, upper_body: Option<bool>) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, is_upper_body
            FROM exercises
            WHERE $1::boolean IS NULL OR is_upper_body = $1
            ORDER BY id
            "#,
        )
        .bind(upper_body)
        .fetch_all(self.pool)
        .await?;

        Ok(exercises)
    }
}

#[async_trait]
impl ReferenceDataSource for ReferenceRepository<'_> {
    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.exercises_where(None).await
    }

    async fn list_upper_body_exercises(&self) -> Result<Vec<Exercise>> {
        self.exercises_where(Some(true)).await
    }

    async fn list_lower_body_exercises(&self) -> Result<Vec<Exercise>> {
        self.exercises_where(Some(false)).await
    }

    async fn get_exercise_by_id(&self, id: i32) -> Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, is_upper_body FROM exercises WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(exercise)
    }

    async fn list_weight_options(&self) -> Result<Vec<WeightOption>> {
        let weights = sqlx::query_as::<_, WeightOption>(
            "SELECT id, value FROM weight_options ORDER BY value",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(weights)
    }

    async fn list_rep_options(&self) -> Result<Vec<RepOption>> {
        let reps =
            sqlx::query_as::<_, RepOption>("SELECT id, value FROM rep_options ORDER BY value")
                .fetch_all(self.pool)
                .await?;

        Ok(reps)
    }

    async fn list_set_options(&self) -> Result<Vec<SetOption>> {
        let sets =
            sqlx::query_as::<_, SetOption>("SELECT id, value FROM set_options ORDER BY value")
                .fetch_all(self.pool)
                .await?;

        Ok(sets)
    }

    async fn resolve_weight_id(&self, weight: i32) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>("SELECT id FROM weight_options WHERE value = $1")
            .bind(weight)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(id)
    }
}

/// A fixed, in-memory catalog.
///
/// The web layer loads one at startup with [`StaticCatalog::load`] and serves
/// every lookup from memory afterwards; tests build one directly.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    exercises: Vec<Exercise>,
    weights: Vec<WeightOption>,
    reps: Vec<RepOption>,
    sets: Vec<SetOption>,
}

impl StaticCatalog {
    pub fn new(
        exercises: Vec<Exercise>,
        weights: Vec<WeightOption>,
        reps: Vec<RepOption>,
        sets: Vec<SetOption>,
    ) -> Self {
        Self {
            exercises,
            weights,
            reps,
            sets,
        }
    }

    /// Snapshot every catalog from another source.
    pub async fn load<S: ReferenceDataSource + ?Sized>(source: &S) -> Result<Self> {
        Ok(Self {
            exercises: source.list_exercises().await?,
            weights: source.list_weight_options().await?,
            reps: source.list_rep_options().await?,
            sets: source.list_set_options().await?,
        })
    }

    fn exercises_where(&self, upper_body: bool) -> Vec<Exercise> {
        self.exercises
            .iter()
            .filter(|exercise| exercise.is_upper_body == upper_body)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ReferenceDataSource for StaticCatalog {
    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises.clone())
    }

    async fn list_upper_body_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises_where(true))
    }

    async fn list_lower_body_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises_where(false))
    }

    async fn get_exercise_by_id(&self, id: i32) -> Result<Exercise> {
        self.exercises
            .iter()
            .find(|exercise| exercise.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_weight_options(&self) -> Result<Vec<WeightOption>> {
        Ok(self.weights.clone())
    }

    async fn list_rep_options(&self) -> Result<Vec<RepOption>> {
        Ok(self.reps.clone())
    }

    async fn list_set_options(&self) -> Result<Vec<SetOption>> {
        Ok(self.sets.clone())
    }

    async fn resolve_weight_id(&self, weight: i32) -> Result<i32> {
        self.weights
            .iter()
            .find(|option| option.value == weight)
            .map(|option| option.id)
            .ok_or(StorageError::NotFound)
    }
}
