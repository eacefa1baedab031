use std::sync::Arc;

use anyhow::Context;
use storage::{
    Database,
    repository::{
        reference::{ReferenceRepository, StaticCatalog},
        workout_log::BatchMode,
    },
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::{accounts, calendar, exercises};
use state::{AppState, SessionSettings};

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::handlers::sign_up,
        accounts::handlers::log_in,
        accounts::handlers::log_out,
        accounts::handlers::demo,
        exercises::handlers::list_exercises,
        exercises::handlers::list_upper,
        exercises::handlers::list_lower,
        exercises::handlers::insert_data_page,
        exercises::handlers::insert_data,
        exercises::handlers::insert_run,
        calendar::handlers::calendar,
        calendar::handlers::edit_exercise_page,
        calendar::handlers::edit_exercise,
        calendar::handlers::delete_exercise,
        calendar::handlers::edit_run_page,
        calendar::handlers::edit_run,
        calendar::handlers::delete_run,
    ),
    components(
        schemas(
            storage::dto::account::SignUpRequest,
            storage::dto::account::LogInRequest,
            storage::dto::account::AccountResponse,
            storage::dto::exercise::ExerciseCatalogResponse,
            storage::dto::exercise::ExerciseGroupResponse,
            storage::dto::exercise::InsertDataPage,
            storage::dto::workout::SetEntry,
            storage::dto::workout::SetUpdate,
            storage::dto::workout::DeleteSetsForm,
            storage::dto::workout::RunForm,
            storage::dto::workout::EditRunForm,
            storage::dto::workout::DeleteRunForm,
            storage::dto::workout::InsertSetsResponse,
            storage::dto::calendar::CalendarView,
            storage::dto::calendar::DayActivity,
            storage::dto::calendar::MonthActivity,
            storage::dto::calendar::WorkoutEntry,
            storage::dto::calendar::EditExercisePage,
            storage::models::Exercise,
            storage::models::WeightOption,
            storage::models::RepOption,
            storage::models::SetOption,
            storage::models::LoggedSet,
            storage::models::Run,
        )
    ),
    tags(
        (name = "accounts", description = "Sign-up, log-in and sessions"),
        (name = "exercises", description = "Exercise catalog and workout logging"),
        (name = "calendar", description = "Workout history, edits and deletes"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(
                            middleware::auth::SESSION_COOKIE,
                        ),
                    ),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting workout tracker");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let catalog = StaticCatalog::load(&ReferenceRepository::new(db.pool()))
        .await
        .context("Failed to load reference catalogs")?;
    tracing::info!("Reference catalogs loaded");

    let batch_mode = if config.atomic_batches {
        BatchMode::Atomic
    } else {
        BatchMode::Sequential
    };

    let state = AppState {
        db,
        catalog: Arc::new(catalog),
        sessions: SessionSettings {
            ttl_days: config.session_ttl_days,
            secure_cookies: config.secure_cookies,
            demo_user_id: config.demo_user_id,
        },
        batch_mode,
    };

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
