use chrono::{Datelike, NaiveDate};
use storage::{
    dto::{
        calendar::{CalendarQuery, CalendarView, EditExerciseQuery, EditExercisePage},
        workout::{EditRunForm, EditSetsForm},
    },
    error::{Result, StorageError},
    models::{LoggedSet, Run},
    repository::{calendar::CalendarRepository, reference::ReferenceDataSource},
    services::calendar_range::calendar_date,
};

use crate::state::AppState;

/// Which calendar view a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    Year(i32),
    Month(i32, u32),
    Day(NaiveDate),
}

/// Missing year means the current one; `day` only counts together with `month`.
pub fn resolve_view(query: &CalendarQuery, today: NaiveDate) -> Result<ViewRequest> {
    let year = query.year.unwrap_or_else(|| today.year());

    match (query.month, query.day) {
        (None, None) => Ok(ViewRequest::Year(year)),
        (None, Some(_)) => Err(StorageError::validation(
            "A day can only be given together with a month",
        )),
        (Some(month), None) => {
            if !(1..=12).contains(&month) {
                return Err(StorageError::Validation(format!(
                    "Month must be between 1 and 12, got {month}"
                )));
            }
            Ok(ViewRequest::Month(year, month))
        }
        (Some(month), Some(day)) => Ok(ViewRequest::Day(calendar_date(year, month, day)?)),
    }
}

pub async fn calendar_view(
    state: &AppState,
    user_id: i32,
    query: &CalendarQuery,
    today: NaiveDate,
) -> Result<CalendarView> {
    let repo = CalendarRepository::new(state.db.pool());

    let view = match resolve_view(query, today)? {
        ViewRequest::Year(year) => CalendarView::Year {
            year,
            active_years: repo.active_years(user_id).await?,
            months: repo.monthly_activity_counts(user_id, year).await?,
        },
        ViewRequest::Month(year, month) => CalendarView::Month {
            year,
            month,
            days: repo.monthly_breakdown(user_id, year, month).await?,
        },
        ViewRequest::Day(date) => CalendarView::Day {
            date,
            workouts: repo.workouts_by_date(user_id, date).await?,
            runs: repo.runs_by_date(user_id, date).await?,
        },
    };

    Ok(view)
}

pub async fn edit_exercise_page(
    state: &AppState,
    user_id: i32,
    query: &EditExerciseQuery,
) -> Result<EditExercisePage> {
    let date = calendar_date(query.year, query.month, query.day)?;
    let exercise = state.catalog.get_exercise_by_id(query.exercise_id).await?;
    let entries = CalendarRepository::new(state.db.pool())
        .exercise_data_by_date_and_exercise(user_id, date, query.exercise_id)
        .await?;

    Ok(EditExercisePage {
        date,
        exercise,
        entries,
        weights: state.catalog.list_weight_options().await?,
        reps: state.catalog.list_rep_options().await?,
        sets: state.catalog.list_set_options().await?,
    })
}

pub async fn update_sets(state: &AppState, user_id: i32, form: &EditSetsForm) -> Result<Vec<LoggedSet>> {
    state.workout_log().update_logged_sets(user_id, &form.updates).await
}

pub async fn delete_sets(state: &AppState, user_id: i32, ids: &[i32]) -> Result<()> {
    state.workout_log().delete_logged_sets(user_id, ids).await
}

pub async fn find_run(state: &AppState, user_id: i32, id: i32) -> Result<Run> {
    CalendarRepository::new(state.db.pool()).find_run(user_id, id).await
}

pub async fn update_run(state: &AppState, user_id: i32, form: &EditRunForm) -> Result<Run> {
    state
        .workout_log()
        .update_run(user_id, form.id, &form.duration, &form.distance)
        .await
}

pub async fn delete_run(state: &AppState, user_id: i32, id: i32) -> Result<()> {
    state.workout_log().delete_run(user_id, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn query(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> CalendarQuery {
        CalendarQuery { year, month, day }
    }

    #[test]
    fn test_empty_query_is_current_year() {
        let view = resolve_view(&CalendarQuery::default(), today()).unwrap();
        assert_eq!(view, ViewRequest::Year(2026));
    }

    #[test]
    fn test_month_and_day_narrow_the_view() {
        assert_eq!(
            resolve_view(&query(Some(2025), Some(3), None), today()).unwrap(),
            ViewRequest::Month(2025, 3)
        );
        assert_eq!(
            resolve_view(&query(None, Some(3), Some(15)), today()).unwrap(),
            ViewRequest::Day(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_invalid_queries_are_rejected() {
        assert!(resolve_view(&query(None, None, Some(3)), today()).is_err());
        assert!(resolve_view(&query(Some(2025), Some(13), None), today()).is_err());
        assert!(resolve_view(&query(Some(2025), Some(2), Some(30)), today()).is_err());
    }
}
