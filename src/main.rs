use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use samm_router::core::error::DiscoveryError;
use samm_router::core::paths::PathDiscoveryEngine;
use samm_router::core::types::DiscoveryConfig;
use samm_router::orchestrator::{
    get_best_shard, get_cross_pool_quote, get_paths, get_stats, refresh_pool_data,
};
use samm_router::types::{
    CrossPoolResponse, PathQuery, PathResponse, ResponseHop, ResponseMetadata, ResponsePath,
    ResponseShard, RouterConfig, ShardComparisonResponse, ShardQuery, StatsResponse,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Shared between handlers and the refresh task
#[derive(Clone)]
struct RouterState {
    config: Arc<RouterConfig>,
    engine: Arc<PathDiscoveryEngine>,
}

type ApiError = (StatusCode, String);

fn api_error(err: DiscoveryError) -> ApiError {
    match err {
        DiscoveryError::MalformedPool(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        _ => (StatusCode::BAD_REQUEST, err.to_string()),
    }
}

// Generate the OpenAPI schema
#[derive(OpenApi)]
#[openapi(
    paths(
        paths_handler,
        best_shard_handler,
        cross_pool_handler,
        stats_handler,
        clear_cache_handler,
        update_pool_data_handler
    ),
    components(
        schemas(
            PathQuery,
            PathResponse,
            ResponsePath,
            ResponseHop,
            ResponseMetadata,
            ShardQuery,
            ShardComparisonResponse,
            ResponseShard,
            CrossPoolResponse,
            StatsResponse
        )
    ),
    tags(
        (name = "paths", description = "Swap path discovery"),
        (name = "shards", description = "Shard comparison and bridged quotes"),
        (name = "admin", description = "Diagnostics and pool data")
    )
)]
struct ApiDoc;

#[utoipa::path(
    get,
    path = "/paths",
    params(PathQuery),
    responses(
        (status = 200, description = "Ranked swap paths", body = PathResponse),
        (status = 400, description = "Invalid request")
    ),
    tag = "paths"
)]
async fn paths_handler(
    State(state): State<RouterState>,
    Query(params): Query<PathQuery>,
) -> Result<Json<PathResponse>, ApiError> {
    get_paths(&state.engine, params).map(Json).map_err(api_error)
}

#[utoipa::path(
    get,
    path = "/best_shard",
    params(ShardQuery),
    responses(
        (status = 200, description = "Every shard of the pair quoted, cheapest first", body = ShardComparisonResponse),
        (status = 400, description = "Invalid request")
    ),
    tag = "shards"
)]
async fn best_shard_handler(
    State(state): State<RouterState>,
    Query(params): Query<ShardQuery>,
) -> Result<Json<ShardComparisonResponse>, ApiError> {
    get_best_shard(&state.engine, params)
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    get,
    path = "/cross_pool",
    params(ShardQuery),
    responses(
        (status = 200, description = "Direct or bridged quote", body = CrossPoolResponse),
        (status = 404, description = "No admissible route"),
        (status = 400, description = "Invalid request")
    ),
    tag = "shards"
)]
async fn cross_pool_handler(
    State(state): State<RouterState>,
    Query(params): Query<ShardQuery>,
) -> Result<Json<CrossPoolResponse>, ApiError> {
    match get_cross_pool_quote(&state.config, &state.engine, params).map_err(api_error)? {
        Some(quote) => Ok(Json(quote)),
        None => Err((StatusCode::NOT_FOUND, "no admissible route".to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Engine counters", body = StatsResponse)
    ),
    tag = "admin"
)]
async fn stats_handler(State(state): State<RouterState>) -> Json<StatsResponse> {
    Json(get_stats(&state.engine))
}

#[utoipa::path(
    post,
    path = "/clear_cache",
    responses(
        (status = 200, description = "Path cache cleared")
    ),
    tag = "admin"
)]
async fn clear_cache_handler(State(state): State<RouterState>) {
    state.engine.clear_cache();
}

#[utoipa::path(
    post,
    path = "/update_pool_data",
    responses(
        (status = 200, description = "Pool snapshot reloaded and graph rebuilt"),
        (status = 500, description = "Snapshot could not be loaded")
    ),
    tag = "admin"
)]
async fn update_pool_data_handler(State(state): State<RouterState>) -> Result<String, ApiError> {
    refresh_pool_data(&state.config, &state.engine)
        .map(|count| format!("Loaded {} pools", count))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))
}

fn spawn_refresh_task(state: RouterState) {
    let period = Duration::from_secs(state.config.refresh_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately; the initial load already happened
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = refresh_pool_data(&state.config, &state.engine) {
                warn!("Pool snapshot refresh failed, keeping previous graph: {:#}", e);
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let openapi = ApiDoc::openapi();
    let config = RouterConfig::load_from(PathBuf::from("router_config.toml"))?;
    let engine = PathDiscoveryEngine::new(DiscoveryConfig::from(&config));

    let state = RouterState {
        config: Arc::new(config),
        engine: Arc::new(engine),
    };
    if let Err(e) = refresh_pool_data(&state.config, &state.engine) {
        warn!("Starting with an empty token graph: {:#}", e);
    }
    if state.config.refresh_interval_secs > 0 {
        spawn_refresh_task(state.clone());
    }

    let listen_addr = state.config.listen_addr.clone();
    let app = Router::new()
        .route("/paths", get(paths_handler))
        .route("/best_shard", get(best_shard_handler))
        .route("/cross_pool", get(cross_pool_handler))
        .route("/stats", get(stats_handler))
        .route("/clear_cache", post(clear_cache_handler))
        .route("/update_pool_data", post(update_pool_data_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(listen_addr.as_str()).await?;
    info!("Server running on http://{}", listen_addr);
    info!("Swagger UI available at http://{}/swagger-ui/", listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
