//! End-to-end checks against a real Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -p storage -- --ignored`.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use storage::StorageError;
use storage::dto::workout::{SetEntry, SetUpdate};
use storage::repository::calendar::CalendarRepository;
use storage::repository::reference::{ReferenceDataSource, ReferenceRepository, StaticCatalog};
use storage::repository::workout_log::{BatchMode, WorkoutLogRepository};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_user(pool: &PgPool, id: i32) {
    sqlx::query("INSERT INTO users (id, name, password) VALUES ($1, $2, 'hash')")
        .bind(id)
        .bind(format!("user-{id}"))
        .execute(pool)
        .await
        .unwrap();
}

async fn catalog(pool: &PgPool) -> StaticCatalog {
    StaticCatalog::load(&ReferenceRepository::new(pool))
        .await
        .unwrap()
}

async fn exercise_id(catalog: &StaticCatalog, name: &str) -> i32 {
    catalog
        .list_exercises()
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.name == name)
        .unwrap()
        .id
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn bench_press_sets_count_as_upper_body_day(pool: PgPool) {
    seed_user(&pool, 7).await;
    let catalog = catalog(&pool).await;
    let bench = exercise_id(&catalog, "Bench Press").await;
    let log = WorkoutLogRepository::new(&pool, &catalog);

    for _ in 0..3 {
        log.insert_logged_set(7, bench, 135, 8, 3, date(2026, 3, 15))
            .await
            .unwrap();
    }

    let calendar = CalendarRepository::new(&pool);
    let months = calendar.monthly_activity_counts(7, 2026).await.unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].month, 3);
    assert_eq!(months[0].total_days, 1);
    assert!(months[0].upper_days >= 1);
    assert_eq!(months[0].lower_days, 0);

    let workouts = calendar.workouts_by_date(7, date(2026, 3, 15)).await.unwrap();
    assert_eq!(workouts.len(), 3);
    assert!(workouts.windows(2).all(|w| w[0].id < w[1].id));
    assert!(workouts.iter().all(|w| w.exercise_name == "Bench Press"
        && w.weight == 135
        && w.reps == 8
        && w.sets == 3));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upper_and_lower_on_one_day_count_once(pool: PgPool) {
    seed_user(&pool, 7).await;
    let catalog = catalog(&pool).await;
    let bench = exercise_id(&catalog, "Bench Press").await;
    let squat = exercise_id(&catalog, "Squat").await;
    let log = WorkoutLogRepository::new(&pool, &catalog);

    log.insert_logged_set(7, bench, 135, 8, 1, date(2026, 5, 2))
        .await
        .unwrap();
    log.insert_logged_set(7, squat, 185, 5, 1, date(2026, 5, 2))
        .await
        .unwrap();
    log.insert_run(7, "00:30:00", "3", date(2026, 5, 3))
        .await
        .unwrap();

    let calendar = CalendarRepository::new(&pool);
    let months = calendar.monthly_activity_counts(7, 2026).await.unwrap();
    assert_eq!(months[0].total_days, 2);
    assert_eq!(months[0].upper_days, 1);
    assert_eq!(months[0].lower_days, 1);
    assert_eq!(months[0].run_days, 1);

    let days = calendar.monthly_breakdown(7, 2026, 5).await.unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, date(2026, 5, 2));
    assert!(days[0].has_upper && days[0].has_lower && !days[0].has_run);
    assert!(!days[1].has_upper && !days[1].has_lower && days[1].has_run);

    assert_eq!(calendar.active_years(7).await.unwrap(), vec![2026]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn run_round_trip_keeps_duration_text(pool: PgPool) {
    seed_user(&pool, 7).await;
    let catalog = catalog(&pool).await;
    let log = WorkoutLogRepository::new(&pool, &catalog);

    log.insert_run(7, "00:45:30", "5.2", date(2026, 3, 15))
        .await
        .unwrap();
    let long = log
        .insert_run(7, "25:00:00", "26.2", date(2026, 3, 16))
        .await
        .unwrap();
    assert_eq!(long.duration, "25:00:00");

    let calendar = CalendarRepository::new(&pool);
    let runs = calendar.runs_by_date(7, date(2026, 3, 15)).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].duration, "00:45:30");
    assert_eq!(runs[0].distance, dec!(5.2));

    let edited = log.update_run(7, runs[0].id, "1:02:03", "6").await.unwrap();
    assert_eq!(edited.duration, "01:02:03");

    log.delete_run(7, runs[0].id).await.unwrap();
    log.delete_run(7, runs[0].id).await.unwrap();
    assert!(matches!(
        calendar.find_run(7, runs[0].id).await,
        Err(StorageError::NotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_is_idempotent_and_scoped(pool: PgPool) {
    seed_user(&pool, 7).await;
    seed_user(&pool, 8).await;
    let catalog = catalog(&pool).await;
    let bench = exercise_id(&catalog, "Bench Press").await;
    let log = WorkoutLogRepository::new(&pool, &catalog);

    let id = log
        .insert_logged_set(7, bench, 135, 8, 3, date(2026, 3, 15))
        .await
        .unwrap();

    assert!(matches!(
        log.update_logged_set(8, id, 135, 10, 3).await,
        Err(StorageError::NotFound)
    ));
    log.delete_logged_set(8, id).await.unwrap();

    let calendar = CalendarRepository::new(&pool);
    assert!(calendar
        .workouts_by_date(8, date(2026, 3, 15))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        calendar.workouts_by_date(7, date(2026, 3, 15)).await.unwrap().len(),
        1
    );

    log.delete_logged_set(7, id).await.unwrap();
    log.delete_logged_set(7, id).await.unwrap();
    assert!(calendar
        .workouts_by_date(7, date(2026, 3, 15))
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn sequential_batches_keep_partial_progress(pool: PgPool) {
    seed_user(&pool, 7).await;
    let catalog = catalog(&pool).await;
    let bench = exercise_id(&catalog, "Bench Press").await;
    let day = date(2026, 3, 15);

    let sequential = WorkoutLogRepository::new(&pool, &catalog);
    let ids = sequential
        .insert_logged_sets(
            7,
            bench,
            2,
            &[
                SetEntry { weight: 135, reps: 8 },
                SetEntry { weight: 145, reps: 6 },
            ],
            day,
        )
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let missing = i32::MAX;
    let updates = [
        SetUpdate { id: ids[0], weight: 155, reps: 5, sets: 2 },
        SetUpdate { id: missing, weight: 155, reps: 5, sets: 2 },
    ];

    let atomic = WorkoutLogRepository::new(&pool, &catalog).with_batch_mode(BatchMode::Atomic);
    assert!(matches!(
        atomic.update_logged_sets(7, &updates).await,
        Err(StorageError::NotFound)
    ));
    let calendar = CalendarRepository::new(&pool);
    let rows = calendar.workouts_by_date(7, day).await.unwrap();
    assert_eq!(rows[0].weight, 135);

    assert!(matches!(
        sequential.update_logged_sets(7, &updates).await,
        Err(StorageError::NotFound)
    ));
    let rows = calendar.workouts_by_date(7, day).await.unwrap();
    assert_eq!(rows[0].weight, 155);
    assert_eq!(rows[1].weight, 145);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn last_logged_data_returns_latest_session(pool: PgPool) {
    seed_user(&pool, 7).await;
    let catalog = catalog(&pool).await;
    let squat = exercise_id(&catalog, "Squat").await;
    let log = WorkoutLogRepository::new(&pool, &catalog);

    log.insert_logged_sets(
        7,
        squat,
        1,
        &[SetEntry { weight: 225, reps: 5 }],
        date(2026, 3, 1),
    )
    .await
    .unwrap();
    log.insert_logged_sets(
        7,
        squat,
        2,
        &[
            SetEntry { weight: 185, reps: 8 },
            SetEntry { weight: 205, reps: 5 },
        ],
        date(2026, 3, 8),
    )
    .await
    .unwrap();

    let calendar = CalendarRepository::new(&pool);
    let last = calendar.last_logged_data(squat, 7).await.unwrap();
    assert_eq!(last.len(), 2);
    assert!(last.iter().all(|row| row.date == date(2026, 3, 8)));
    assert_eq!(last[0].weight, 205);
    assert_eq!(last[1].weight, 185);

    assert!(calendar.last_logged_data(squat, 8).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn other_users_runs_and_history_are_invisible(pool: PgPool) {
    seed_user(&pool, 7).await;
    seed_user(&pool, 8).await;
    let catalog = catalog(&pool).await;
    let bench = exercise_id(&catalog, "Bench Press").await;
    let squat = exercise_id(&catalog, "Squat").await;
    let log = WorkoutLogRepository::new(&pool, &catalog);
    let day = date(2026, 3, 15);

    log.insert_logged_set(7, bench, 135, 8, 1, day).await.unwrap();
    log.insert_logged_set(7, squat, 185, 5, 1, day).await.unwrap();
    let run = log.insert_run(7, "00:45:30", "5.2", day).await.unwrap();

    assert!(matches!(
        log.update_run(8, run.id, "01:00:00", "6").await,
        Err(StorageError::NotFound)
    ));
    log.delete_run(8, run.id).await.unwrap();

    let calendar = CalendarRepository::new(&pool);
    assert!(matches!(
        calendar.find_run(8, run.id).await,
        Err(StorageError::NotFound)
    ));
    assert!(calendar.runs_by_date(8, day).await.unwrap().is_empty());
    assert!(calendar.monthly_activity_counts(8, 2026).await.unwrap().is_empty());
    assert!(calendar.monthly_breakdown(8, 2026, 3).await.unwrap().is_empty());
    assert!(calendar.active_years(8).await.unwrap().is_empty());
    assert!(calendar
        .exercise_data_by_date_and_exercise(8, day, bench)
        .await
        .unwrap()
        .is_empty());

    let owned = calendar.find_run(7, run.id).await.unwrap();
    assert_eq!(owned.duration, "00:45:30");
    assert_eq!(owned.distance, dec!(5.2));
    assert_eq!(calendar.runs_by_date(7, day).await.unwrap().len(), 1);
    assert_eq!(calendar.monthly_activity_counts(7, 2026).await.unwrap().len(), 1);
    assert_eq!(calendar.monthly_breakdown(7, 2026, 3).await.unwrap().len(), 1);
    assert_eq!(calendar.active_years(7).await.unwrap(), vec![2026]);
    assert_eq!(
        calendar
            .exercise_data_by_date_and_exercise(7, day, bench)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn last_logged_data_uses_newest_row_set_count(pool: PgPool) {
    seed_user(&pool, 7).await;
    let catalog = catalog(&pool).await;
    let bench = exercise_id(&catalog, "Bench Press").await;
    let log = WorkoutLogRepository::new(&pool, &catalog);
    let day = date(2026, 4, 4);

    let ids = log
        .insert_logged_sets(
            7,
            bench,
            3,
            &[
                SetEntry { weight: 135, reps: 8 },
                SetEntry { weight: 145, reps: 6 },
                SetEntry { weight: 155, reps: 4 },
            ],
            day,
        )
        .await
        .unwrap();
    log.update_logged_set(7, ids[2], 155, 4, 2).await.unwrap();

    let calendar = CalendarRepository::new(&pool);
    for _ in 0..5 {
        let last = calendar.last_logged_data(bench, 7).await.unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].weight, 155);
        assert_eq!(last[1].weight, 145);
    }
}
