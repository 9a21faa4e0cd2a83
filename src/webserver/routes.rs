use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::report::ComparisonReport;
use crate::shared::errors::{AppError, ComparisonError};
use crate::shared::utils::validate_pool_address;
use crate::webserver::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/pool-config-debug", get(pool_config_debug))
}

#[derive(Debug, Default, Deserialize)]
pub struct PoolPairQuery {
    pub pool1: Option<String>,
    pub pool2: Option<String>,
}

/// Error responses of the comparison endpoint
#[derive(Debug)]
pub enum ApiError {
    NotConfigured,
    InvalidAddress(String),
    Comparison(ComparisonError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "RPC endpoint is not configured" }),
            ),
            ApiError::InvalidAddress(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Comparison(e) => match e {
                ComparisonError::PoolsNotFound {
                    pool1_found,
                    pool2_found,
                } => (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": e.to_string(),
                        "pool1Found": pool1_found,
                        "pool2Found": pool2_found,
                    }),
                ),
                ComparisonError::PoolsUndecodable => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({ "error": e.to_string() }),
                ),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ComparisonError> for ApiError {
    fn from(err: ComparisonError) -> Self {
        ApiError::Comparison(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::InvalidAddress(err.to_string())
    }
}

/// GET /api/pool-config-debug?pool1=&pool2=
async fn pool_config_debug(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PoolPairQuery>,
) -> Result<Json<ComparisonReport>, ApiError> {
    let service = state.comparison.as_ref().ok_or_else(|| {
        warn!("Comparison requested but no RPC endpoint is configured");
        ApiError::NotConfigured
    })?;

    let pool1 = query.pool1.unwrap_or_else(|| state.default_pool1.clone());
    let pool2 = query.pool2.unwrap_or_else(|| state.default_pool2.clone());
    let pool1 = validate_pool_address(&pool1)?.to_string();
    let pool2 = validate_pool_address(&pool2)?.to_string();

    let report = service.compare(&pool1, &pool2).await.map_err(|e| {
        warn!("Comparison of {} and {} failed: {}", pool1, pool2, e);
        ApiError::from(e)
    })?;
    Ok(Json(report))
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = chrono::Utc::now() - state.startup_time;
    Json(json!({
        "status": "ok",
        "rpcConfigured": state.rpc_configured(),
        "uptimeSeconds": uptime.num_seconds(),
    }))
}
