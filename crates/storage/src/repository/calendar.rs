use chrono::NaiveDate;
use sqlx::PgPool;

use crate::dto::calendar::{DayActivity, MonthActivity, WorkoutEntry};
use crate::error::{Result, StorageError};
use crate::models::Run;
use crate::services::activity_rollup::summarize_months;
use crate::services::calendar_range::{month_range, year_range};

/// How many of the user's most recent rows for an exercise are inspected
/// when looking for the last session.
const LAST_SESSION_SCAN: i64 = 10;

const WORKOUT_ENTRY_SELECT: &str = r#"
    SELECT ls.id, ls.date, ls.exercise_id, e.name AS exercise_name, e.is_upper_body,
           ls.weight_id, w.value AS weight, ls.reps, ls.sets
    FROM logged_sets ls
    JOIN exercises e ON e.id = ls.exercise_id
    JOIN weight_options w ON w.id = ls.weight_id
"#;

/// Read side of the workout log: day flags, month rollups and per-day detail.
/// Every query is filtered by the requesting user.
pub struct CalendarRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CalendarRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Activity flags for every date in `[from, to)` that has a logged set or a run.
    pub async fn day_activity(
        &self,
        user_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayActivity>> {
        let days = sqlx::query_as::<_, DayActivity>(
            r#"
            WITH activity_days AS (
                SELECT date FROM logged_sets
                WHERE user_id = $1 AND date >= $2 AND date < $3
                UNION
                SELECT date FROM runs
                WHERE user_id = $1 AND date >= $2 AND date < $3
            )
            SELECT
                d.date,
                EXISTS (
                    SELECT 1 FROM logged_sets ls
                    JOIN exercises e ON e.id = ls.exercise_id
                    WHERE ls.user_id = $1 AND ls.date = d.date AND e.is_upper_body
                ) AS has_upper,
                EXISTS (
                    SELECT 1 FROM logged_sets ls
                    JOIN exercises e ON e.id = ls.exercise_id
                    WHERE ls.user_id = $1 AND ls.date = d.date AND NOT e.is_upper_body
                ) AS has_lower,
                EXISTS (
                    SELECT 1 FROM runs r
                    WHERE r.user_id = $1 AND r.date = d.date
                ) AS has_run
            FROM activity_days d
            ORDER BY d.date
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(days)
    }

    /// Per-month activity counts for one year, months without activity omitted.
    pub async fn monthly_activity_counts(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<Vec<MonthActivity>> {
        let (from, to) = year_range(year)?;
        let days = self.day_activity(user_id, from, to).await?;

        Ok(summarize_months(&days))
    }

    /// Day-by-day flags for one month, ascending by date.
    pub async fn monthly_breakdown(
        &self,
        user_id: i32,
        year: i32,
        month: u32,
    ) -> Result<Vec<DayActivity>> {
        let (from, to) = month_range(year, month)?;
        self.day_activity(user_id, from, to).await
    }

    /// Years with any activity, newest first.
    pub async fn active_years(&self, user_id: i32) -> Result<Vec<i32>> {
        let years = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT EXTRACT(YEAR FROM d.date)::int AS year
            FROM (
                SELECT date FROM logged_sets WHERE user_id = $1
                UNION
                SELECT date FROM runs WHERE user_id = $1
            ) d
            ORDER BY year DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(years)
    }

    /// Logged sets on one date in insertion order.
    pub async fn workouts_by_date(&self, user_id: i32, date: NaiveDate) -> Result<Vec<WorkoutEntry>> {
        let query = format!(
            "{WORKOUT_ENTRY_SELECT} WHERE ls.user_id = $1 AND ls.date = $2 ORDER BY ls.id"
        );

        let workouts = sqlx::query_as::<_, WorkoutEntry>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_all(self.pool)
            .await?;

        Ok(workouts)
    }

    pub async fn runs_by_date(&self, user_id: i32, date: NaiveDate) -> Result<Vec<Run>> {
        let runs = sqlx::query_as::<_, Run>(
            r#"
            SELECT id, user_id, date, to_char(duration, 'HH24:MI:SS') AS duration, distance
            FROM runs
            WHERE user_id = $1 AND date = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(self.pool)
        .await?;

        Ok(runs)
    }

    pub async fn find_run(&self, user_id: i32, id: i32) -> Result<Run> {
        let run = sqlx::query_as::<_, Run>(
            r#"
            SELECT id, user_id, date, to_char(duration, 'HH24:MI:SS') AS duration, distance
            FROM runs
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(run)
    }

    /// The rows of one exercise on one date, for the edit form.
    pub async fn exercise_data_by_date_and_exercise(
        &self,
        user_id: i32,
        date: NaiveDate,
        exercise_id: i32,
    ) -> Result<Vec<WorkoutEntry>> {
        let query = format!(
            "{WORKOUT_ENTRY_SELECT} WHERE ls.user_id = $1 AND ls.date = $2 AND ls.exercise_id = $3 ORDER BY ls.id"
        );

        let entries = sqlx::query_as::<_, WorkoutEntry>(&query)
            .bind(user_id)
            .bind(date)
            .bind(exercise_id)
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }

    /// The rows of the user's most recent session of an exercise, heaviest
    /// first, capped at that session's set count.
    ///
    /// Only the latest few rows are scanned to find the session date, so this
    /// is a pre-fill convenience rather than a full history search.
    pub async fn last_logged_data(&self, exercise_id: i32, user_id: i32) -> Result<Vec<WorkoutEntry>> {
        let recent = sqlx::query_as::<_, (NaiveDate, i32)>(
            r#"
            SELECT date, sets
            FROM logged_sets
            WHERE exercise_id = $1 AND user_id = $2
            ORDER BY date DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(exercise_id)
        .bind(user_id)
        .bind(LAST_SESSION_SCAN)
        .fetch_all(self.pool)
        .await?;

        let Some((date, sets)) = latest_session(&recent) else {
            return Ok(Vec::new());
        };

        let query = format!(
            "{WORKOUT_ENTRY_SELECT} WHERE ls.exercise_id = $1 AND ls.user_id = $2 AND ls.date = $3 \
             ORDER BY ls.weight_id DESC, ls.reps DESC LIMIT $4"
        );

        let entries = sqlx::query_as::<_, WorkoutEntry>(&query)
            .bind(exercise_id)
            .bind(user_id)
            .bind(date)
            .bind(i64::from(sets))
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }
}

/// Pick the latest date among scanned `(date, sets)` rows together with that
/// row's set count. Rows arrive newest id first, so the first row wins a tie.
fn latest_session(rows: &[(NaiveDate, i32)]) -> Option<(NaiveDate, i32)> {
    rows.iter().copied().reduce(|latest, row| {
        if row.0 > latest.0 { row } else { latest }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_latest_session_picks_max_date() {
        let rows = [(date(3, 1), 3), (date(3, 9), 4), (date(2, 20), 5)];
        assert_eq!(latest_session(&rows), Some((date(3, 9), 4)));
    }

    #[test]
    fn test_latest_session_tie_keeps_first_row() {
        let rows = [(date(3, 9), 3), (date(3, 9), 5)];
        assert_eq!(latest_session(&rows), Some((date(3, 9), 3)));
    }

    #[test]
    fn test_latest_session_empty() {
        assert_eq!(latest_session(&[]), None);
    }
}
