mod config;
mod delivery;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::delivery::http::v1::{
    achievements, admin, middleware::auth_middleware, pizzerias, ratings, saved, styles, users,
};
use crate::repository::postgres::{
    create_pool, PostgresAchievementRepository, PostgresDoughStyleRepository,
    PostgresPizzeriaRepository, PostgresRatingRepository, PostgresSavedPizzeriaRepository,
    PostgresUserLocationRepository,
};
use crate::usecase::achievements::AchievementsUseCase;
use crate::usecase::discovery::{DiscoveryConfig, DiscoveryUseCase};
use crate::usecase::dough_styles::DoughStylesUseCase;
use crate::usecase::jwt::JwtService;
use crate::usecase::overpass::OverpassClient;
use crate::usecase::pizzerias::PizzeriasUseCase;
use crate::usecase::ratings::RatingsUseCase;
use crate::usecase::saved::SavedUseCase;
use crate::usecase::users::UsersUseCase;

pub struct AppState {
    pub discovery_usecase: DiscoveryUseCase<PostgresPizzeriaRepository, OverpassClient>,
    pub pizzerias_usecase: PizzeriasUseCase<
        PostgresPizzeriaRepository,
        PostgresRatingRepository,
        PostgresDoughStyleRepository,
    >,
    pub ratings_usecase: RatingsUseCase<PostgresRatingRepository, PostgresPizzeriaRepository>,
    pub dough_styles_usecase:
        DoughStylesUseCase<PostgresDoughStyleRepository, PostgresPizzeriaRepository>,
    pub saved_usecase: SavedUseCase<PostgresSavedPizzeriaRepository, PostgresPizzeriaRepository>,
    pub achievements_usecase: AchievementsUseCase<
        PostgresAchievementRepository,
        PostgresRatingRepository,
        PostgresUserLocationRepository,
    >,
    pub users_usecase: UsersUseCase<PostgresUserLocationRepository>,
    pub jwt_service: JwtService,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::from_env()?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let tracer_provider = if config.telemetry_enabled {
        let telemetry_config = telemetry::TelemetryConfig::from(&config);
        let provider = telemetry::init_telemetry_with_subscriber(&telemetry_config, env_filter)
            .map_err(|e| anyhow::anyhow!("failed to initialize telemetry: {e}"))?;
        Some(provider)
    } else {
        telemetry::init_subscriber_without_telemetry(env_filter);
        None
    };

    tracing::info!("starting the pizzerias service");

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("database pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    let pizzeria_repository = PostgresPizzeriaRepository::new(pool.clone());
    let rating_repository = PostgresRatingRepository::new(pool.clone());
    let style_repository = PostgresDoughStyleRepository::new(pool.clone());
    let saved_repository = PostgresSavedPizzeriaRepository::new(pool.clone());
    let achievement_repository = PostgresAchievementRepository::new(pool.clone());
    let location_repository = PostgresUserLocationRepository::new(pool);

    let overpass_client = OverpassClient::new(
        config.overpass_url.clone(),
        Duration::from_secs(config.overpass_timeout_secs),
    )?;
    tracing::info!(overpass_url = %config.overpass_url, "overpass client configured");

    let shared_state = Arc::new(AppState {
        discovery_usecase: DiscoveryUseCase::new(
            pizzeria_repository.clone(),
            overpass_client,
            DiscoveryConfig {
                min_cached_results: config.discovery_min_cached_results,
            },
        ),
        pizzerias_usecase: PizzeriasUseCase::new(
            pizzeria_repository.clone(),
            rating_repository.clone(),
            style_repository.clone(),
        ),
        ratings_usecase: RatingsUseCase::new(rating_repository.clone(), pizzeria_repository.clone()),
        dough_styles_usecase: DoughStylesUseCase::new(style_repository, pizzeria_repository.clone()),
        saved_usecase: SavedUseCase::new(saved_repository, pizzeria_repository),
        achievements_usecase: AchievementsUseCase::new(
            achievement_repository,
            rating_repository,
            location_repository.clone(),
        ),
        users_usecase: UsersUseCase::new(location_repository),
        jwt_service: JwtService::new(config.jwt_secret.clone()),
        metrics_handle,
    });

    // All API routes require authentication
    let api = Router::new()
        .route("/api/v1/pizzerias", post(pizzerias::submit_pizzeria))
        .route("/api/v1/pizzerias/nearby", get(pizzerias::discover_nearby))
        .route("/api/v1/pizzerias/{id}", get(pizzerias::get_pizzeria))
        .route(
            "/api/v1/pizzerias/{id}/rating",
            get(ratings::get_user_rating)
                .put(ratings::submit_rating)
                .delete(ratings::remove_rating),
        )
        .route("/api/v1/pizzerias/{id}/reviews", get(ratings::list_reviews))
        .route(
            "/api/v1/pizzerias/{id}/styles",
            get(styles::list_styles).post(styles::suggest_style),
        )
        .route(
            "/api/v1/pizzerias/{id}/save",
            get(saved::get_saved_status)
                .put(saved::save_pizzeria)
                .delete(saved::unsave_pizzeria),
        )
        .route("/api/v1/styles/{tag_id}/vote", post(styles::vote_style))
        .route("/api/v1/admin/styles/{tag_id}", put(admin::moderate_style))
        .route("/api/v1/saved", get(saved::list_saved))
        .route("/api/v1/achievements", get(achievements::list_achievements))
        .route(
            "/api/v1/achievements/evaluate",
            post(achievements::evaluate_achievements),
        )
        .route(
            "/api/v1/me/location",
            get(users::get_location).put(users::update_location),
        )
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, "pizzerias service listening");
    axum::serve(listener, router).await?;

    if let Some(provider) = tracer_provider {
        telemetry::shutdown_telemetry(provider);
    }

    Ok(())
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}

#[tracing::instrument]
async fn healthz() -> &'static str {
    "OK"
}
