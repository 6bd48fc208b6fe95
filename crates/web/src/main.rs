use anyhow::Context;
use assessment::Database;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use features::{assessments, tools};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        tools::handlers::get_dimensions,
        assessments::handlers::create_assessment,
        assessments::handlers::get_assessment,
        assessments::handlers::update_dimensions,
        assessments::handlers::update_dimension,
        assessments::handlers::update_requirement,
        assessments::handlers::delete_requirement,
        assessments::handlers::calculate_scores,
    ),
    components(
        schemas(
            assessment::dto::CreateAssessmentRequest,
            assessment::dto::DimensionRequirement,
            assessment::dto::CriterionRef,
            assessment::dto::RequirementRequest,
            assessment::dto::CriterionValue,
            assessment::dto::AssessmentCreated,
            assessment::dto::AssessmentView,
            assessment::dto::DimensionRequirementView,
            assessment::dto::RequirementView,
            assessment::dto::SupplierScores,
            assessment::dto::DimensionScores,
            assessment::dto::RequirementScore,
            assessment::dto::DimensionDefinition,
            assessment::dto::DimensionOption,
            assessment::dto::OptionGroup,
            assessment::dto::WeightingRange,
            assessment::dto::CriterionDefinition,
            assessment::models::AssessmentStatus,
        )
    ),
    tags(
        (name = "tools", description = "Assessment tool catalogue"),
        (name = "assessments", description = "Assessment definition and scoring"),
    )
)]
struct ApiDoc;

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/tools", tools::routes::routes())
        .nest("/api/assessments", assessments::routes::routes())
        .layer(cors)
        .with_state(state)
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

    tracing::info!("Starting assessment scoring API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(
        gates = ?config.scoring.gate_dimensions,
        primary = %config.scoring.primary_submission_type,
        alternate = %config.scoring.alternate_submission_type,
        "Configuration loaded successfully"
    );

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

    let state = AppState::new(db, config.scoring);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
