use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

use crate::dto::workout::{SetEntry, SetUpdate};
use crate::error::{Result, StorageError};
use crate::models::{LoggedSet, Run, RunDistance, RunDuration};
use crate::repository::reference::ReferenceDataSource;

/// How multi-row mutations are committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// Each row commits on its own. A failure part way through leaves the
    /// earlier rows applied and is reported once.
    #[default]
    Sequential,
    /// The whole batch runs in one transaction and rolls back on failure.
    Atomic,
}

const LOGGED_SET_COLUMNS: &str = "id, user_id, date, exercise_id, weight_id, reps, sets";

const RUN_COLUMNS: &str =
    "id, user_id, date, to_char(duration, 'HH24:MI:SS') AS duration, distance";

/// Inserts, edits and deletes logged sets and runs.
///
/// Every operation is scoped to the acting user: a row owned by someone else
/// behaves exactly like a row that does not exist.
pub struct WorkoutLogRepository<'a, R: ReferenceDataSource + ?Sized> {
    pool: &'a PgPool,
    reference: &'a R,
    batch_mode: BatchMode,
}

impl<'a, R: ReferenceDataSource + ?Sized> WorkoutLogRepository<'a, R> {
    pub fn new(pool: &'a PgPool, reference: &'a R) -> Self {
        Self {
            pool,
            reference,
            batch_mode: BatchMode::default(),
        }
    }

    pub fn with_batch_mode(mut self, batch_mode: BatchMode) -> Self {
        self.batch_mode = batch_mode;
        self
    }

    /// Log one weight/reps row and return its id.
    pub async fn insert_logged_set(
        &self,
        user_id: i32,
        exercise_id: i32,
        weight: i32,
        reps: i32,
        sets: i32,
        date: NaiveDate,
    ) -> Result<i32> {
        check_counts(reps, sets)?;
        let weight_id = self.reference.resolve_weight_id(weight).await?;

        let id = insert_logged_set_row(
            self.pool,
            user_id,
            date,
            exercise_id,
            weight_id,
            reps,
            sets,
        )
        .await?;

        tracing::debug!(user_id, exercise_id, id, "Logged set inserted");
        Ok(id)
    }

    /// Log one row per entry. Every row stores `set_count` as its `sets` value.
    ///
    /// All weights are resolved before anything is written, so an unknown
    /// weight rejects the whole batch.
    pub async fn insert_logged_sets(
        &self,
        user_id: i32,
        exercise_id: i32,
        set_count: i32,
        entries: &[SetEntry],
        date: NaiveDate,
    ) -> Result<Vec<i32>> {
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            check_counts(entry.reps, set_count)?;
            let weight_id = self.reference.resolve_weight_id(entry.weight).await?;
            rows.push((weight_id, entry.reps));
        }

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(rows.len());
        match self.batch_mode {
            BatchMode::Sequential => {
                for (weight_id, reps) in rows {
                    ids.push(
                        insert_logged_set_row(
                            self.pool,
                            user_id,
                            date,
                            exercise_id,
                            weight_id,
                            reps,
                            set_count,
                        )
                        .await?,
                    );
                }
            }
            BatchMode::Atomic => {
                let mut tx = self.pool.begin().await?;
                for (weight_id, reps) in rows {
                    ids.push(
                        insert_logged_set_row(
                            &mut *tx,
                            user_id,
                            date,
                            exercise_id,
                            weight_id,
                            reps,
                            set_count,
                        )
                        .await?,
                    );
                }
                tx.commit().await?;
            }
        }

        tracing::debug!(user_id, exercise_id, count = ids.len(), "Logged sets inserted");
        Ok(ids)
    }

    /// Overwrite weight, reps and sets of one row
    pub async fn update_logged_set(
        &self,
        user_id: i32,
        id: i32,
        weight: i32,
        reps: i32,
        sets: i32,
    ) -> Result<LoggedSet> {
        check_counts(reps, sets)?;
        let weight_id = self.reference.resolve_weight_id(weight).await?;

        update_logged_set_row(self.pool, user_id, id, weight_id, reps, sets).await
    }

    /// Apply several row edits. Weights are resolved up front like inserts.
    pub async fn update_logged_sets(
        &self,
        user_id: i32,
        updates: &[SetUpdate],
    ) -> Result<Vec<LoggedSet>> {
        let mut rows = Vec::with_capacity(updates.len());
        for update in updates {
            check_counts(update.reps, update.sets)?;
            let weight_id = self.reference.resolve_weight_id(update.weight).await?;
            rows.push((update.id, weight_id, update.reps, update.sets));
        }

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated = Vec::with_capacity(rows.len());
        match self.batch_mode {
            BatchMode::Sequential => {
                for (id, weight_id, reps, sets) in rows {
                    updated.push(
                        update_logged_set_row(self.pool, user_id, id, weight_id, reps, sets)
                            .await?,
                    );
                }
            }
            BatchMode::Atomic => {
                let mut tx = self.pool.begin().await?;
                for (id, weight_id, reps, sets) in rows {
                    updated.push(
                        update_logged_set_row(&mut *tx, user_id, id, weight_id, reps, sets)
                            .await?,
                    );
                }
                tx.commit().await?;
            }
        }

        tracing::debug!(user_id, count = updated.len(), "Logged sets updated");
        Ok(updated)
    }

    /// Deleting a row that does not exist is not an error.
    pub async fn delete_logged_set(&self, user_id: i32, id: i32) -> Result<()> {
        delete_logged_set_row(self.pool, user_id, id).await
    }

    pub async fn delete_logged_sets(&self, user_id: i32, ids: &[i32]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        match self.batch_mode {
            BatchMode::Sequential => {
                for &id in ids {
                    delete_logged_set_row(self.pool, user_id, id).await?;
                }
            }
            BatchMode::Atomic => {
                let mut tx = self.pool.begin().await?;
                for &id in ids {
                    delete_logged_set_row(&mut *tx, user_id, id).await?;
                }
                tx.commit().await?;
            }
        }

        tracing::debug!(user_id, count = ids.len(), "Logged sets deleted");
        Ok(())
    }

    /// Validate and store a run. Duration is checked before distance.
    pub async fn insert_run(
        &self,
        user_id: i32,
        duration: &str,
        distance: &str,
        date: NaiveDate,
    ) -> Result<Run> {
        let (duration, distance) = validate_run(duration, distance)?;

        let query = format!(
            r#"
            INSERT INTO runs (user_id, date, duration, distance)
            VALUES ($1, $2, $3::interval, $4)
            RETURNING {RUN_COLUMNS}
            "#
        );
        let run = sqlx::query_as::<_, Run>(&query)
            .bind(user_id)
            .bind(date)
            .bind(duration.to_string())
            .bind(distance.value())
            .fetch_one(self.pool)
            .await?;

        tracing::debug!(user_id, id = run.id, "Run inserted");
        Ok(run)
    }

    pub async fn update_run(
        &self,
        user_id: i32,
        id: i32,
        duration: &str,
        distance: &str,
    ) -> Result<Run> {
        let (duration, distance) = validate_run(duration, distance)?;

        let query = format!(
            r#"
            UPDATE runs
            SET duration = $3::interval,
                distance = $4
            WHERE id = $1 AND user_id = $2
            RETURNING {RUN_COLUMNS}
            "#
        );
        let run = sqlx::query_as::<_, Run>(&query)
            .bind(id)
            .bind(user_id)
            .bind(duration.to_string())
            .bind(distance.value())
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(run)
    }

    /// Deleting a run that does not exist is not an error.
    pub async fn delete_run(&self, user_id: i32, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM runs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

fn validate_run(duration: &str, distance: &str) -> Result<(RunDuration, RunDistance)> {
    let duration = RunDuration::parse(duration)?;
    let distance = RunDistance::parse(distance)?;
    Ok((duration, distance))
}

fn check_counts(reps: i32, sets: i32) -> Result<()> {
    if reps < 1 {
        return Err(StorageError::validation("Reps must be at least 1"));
    }
    if sets < 1 {
        return Err(StorageError::validation("Sets must be at least 1"));
    }
    Ok(())
}

/// An unknown exercise surfaces as a foreign key violation.
fn missing_reference(error: sqlx::Error) -> StorageError {
    let error = StorageError::from(error);
    if error.is_foreign_key_violation() {
        StorageError::NotFound
    } else {
        error
    }
}

async fn insert_logged_set_row<'e, E>(
    executor: E,
    user_id: i32,
    date: NaiveDate,
    exercise_id: i32,
    weight_id: i32,
    reps: i32,
    sets: i32,
) -> Result<i32>
where
    E: PgExecutor<'e>,
{
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO logged_sets (user_id, date, exercise_id, weight_id, reps, sets)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(exercise_id)
    .bind(weight_id)
    .bind(reps)
    .bind(sets)
    .fetch_one(executor)
    .await
    .map_err(missing_reference)?;

    Ok(id)
}

async fn update_logged_set_row<'e, E>(
    executor: E,
    user_id: i32,
    id: i32,
    weight_id: i32,
    reps: i32,
    sets: i32,
) -> Result<LoggedSet>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        r#"
        UPDATE logged_sets
        SET weight_id = $3,
            reps = $4,
            sets = $5
        WHERE id = $1 AND user_id = $2
        RETURNING {LOGGED_SET_COLUMNS}
        "#
    );

    sqlx::query_as::<_, LoggedSet>(&query)
        .bind(id)
        .bind(user_id)
        .bind(weight_id)
        .bind(reps)
        .bind(sets)
        .fetch_optional(executor)
        .await?
        .ok_or(StorageError::NotFound)
}

async fn delete_logged_set_row<'e, E>(executor: E, user_id: i32, id: i32) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query("DELETE FROM logged_sets WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(())
}
