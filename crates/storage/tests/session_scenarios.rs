//! Session storage against a real Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -p storage -- --ignored`.

use sqlx::PgPool;
use storage::repository::session::SessionRepository;

async fn seed_user(pool: &PgPool, id: i32) {
    sqlx::query("INSERT INTO users (id, name, password) VALUES ($1, $2, 'hash')")
        .bind(id)
        .bind(format!("user-{id}"))
        .execute(pool)
        .await
        .unwrap();
}

async fn session_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn creating_a_session_purges_expired_ones(pool: PgPool) {
    seed_user(&pool, 7).await;
    let expired = "a".repeat(64);
    sqlx::query(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, 7, now() - interval '1 day')",
    )
    .bind(&expired)
    .execute(&pool)
    .await
    .unwrap();

    let sessions = SessionRepository::new(&pool);
    assert!(sessions.find_user(&expired).await.unwrap().is_none());
    assert_eq!(session_count(&pool).await, 1);

    let token = sessions.create(7, 30).await.unwrap();

    assert_eq!(session_count(&pool).await, 1);
    let user = sessions.find_user(&token).await.unwrap().unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(sessions.purge_expired().await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleted_session_no_longer_resolves(pool: PgPool) {
    seed_user(&pool, 7).await;
    let sessions = SessionRepository::new(&pool);

    let token = sessions.create(7, 30).await.unwrap();
    sessions.delete(&token).await.unwrap();

    assert!(sessions.find_user(&token).await.unwrap().is_none());
}
