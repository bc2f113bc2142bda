//! API Request Handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::types::*;
use crate::core::orchestrator::AnalysisOrchestrator;
use crate::models::errors::{AppError, ErrorCode};
use crate::models::types::{parse_address, to_lower_hex, AnalysisResult};
use crate::monitoring::registry::MonitoringRegistry;
use crate::providers::notifier::{subscription_message, Notifier};

/// Shared application state
pub struct AppState {
    pub orchestrator: AnalysisOrchestrator,
    pub registry: Arc<MonitoringRegistry>,
    /// `None` disables confirmation messages
    pub notifier: Option<Arc<dyn Notifier>>,
    pub chain_name: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        orchestrator: AnalysisOrchestrator,
        registry: Arc<MonitoringRegistry>,
        notifier: Option<Arc<dyn Notifier>>,
        chain_name: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            notifier,
            chain_name: chain_name.into(),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn bad_request(message: impl Into<String>, start: Instant) -> ApiFailure {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(ApiError::bad_request(message), elapsed_ms(start))),
    )
}

/// Map a pipeline error to its status code and a client-safe body
fn failure(err: &AppError, start: Instant) -> ApiFailure {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiResponse::error(err.into(), elapsed_ms(start))))
}

fn required_address(
    raw: Option<&str>,
    field: &str,
    start: Instant,
) -> Result<alloy_primitives::Address, ApiFailure> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad_request(format!("Missing {}", field), start))?;
    parse_address(raw).map_err(|_| bad_request(format!("Invalid {} address", field), start))
}

fn required_target(raw: Option<&str>, start: Instant) -> Result<String, ApiFailure> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| bad_request("Missing targetId", start))
}

fn monitor_body(
    payload: Result<Json<MonitorRequest>, JsonRejection>,
    start: Instant,
) -> Result<MonitorRequest, ApiFailure> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| bad_request(format!("Invalid request body: {}", rejection.body_text()), start))
}

fn query_params<T>(
    params: Result<Query<T>, QueryRejection>,
    start: Instant,
) -> Result<T, ApiFailure> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| bad_request(format!("Invalid query string: {}", rejection.body_text()), start))
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        chain: state.chain_name.clone(),
        watched_deployers: state.registry.watched_count(),
        notifications_enabled: state.notifier.is_some(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Deployer Analysis
// ============================================

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AnalyzeParams>, QueryRejection>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiFailure> {
    let start = Instant::now();

    let params = query_params(params, start)?;
    let contract = required_address(params.address.as_deref(), "address", start)?;

    match state.orchestrator.analyze(contract).await {
        Ok(result) => {
            if result.partial {
                warn!(
                    contract = %contract,
                    code = ErrorCode::PartialResult.as_str(),
                    failures = result.partial_failures.len(),
                    "⚠️ Partial analysis returned"
                );
            }
            Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
        }
        Err(e) if e.code == ErrorCode::NotFound => {
            info!(contract = %contract, "Deployer not found");
            Err(failure(&e, start))
        }
        Err(e) => {
            error!(contract = %contract, code = e.code_str(), "❌ Analysis failed: {}", e);
            Err(failure(&e, start))
        }
    }
}

// ============================================
// Monitoring
// ============================================

/// Record first, then confirm. A failed confirmation never undoes the subscription.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MonitorRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MonitorData>>, ApiFailure> {
    let start = Instant::now();

    let req = monitor_body(payload, start)?;
    let deployer = required_address(req.deployer.as_deref(), "deployer", start)?;
    let target = required_target(req.target_id.as_deref(), start)?;

    let newly_added = state.registry.subscribe(deployer, target.clone());
    let deployer_hex = to_lower_hex(&deployer);

    let notified = match &state.notifier {
        Some(notifier) => {
            let text = subscription_message(&deployer_hex, &state.chain_name);
            if let Err(e) = notifier.send(&target, &text).await {
                error!(
                    deployer = %deployer_hex,
                    code = e.code_str(),
                    "❌ Confirmation failed, subscription kept: {}",
                    e.message
                );
                return Err(failure(&e, start));
            }
            true
        }
        None => false,
    };

    Ok(Json(ApiResponse::success(
        MonitorData {
            deployer: deployer_hex,
            target_id: target,
            newly_added,
            notified,
        },
        elapsed_ms(start),
    )))
}

pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MonitorRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UnsubscribeData>>, ApiFailure> {
    let start = Instant::now();

    let req = monitor_body(payload, start)?;
    let deployer = required_address(req.deployer.as_deref(), "deployer", start)?;
    let target = required_target(req.target_id.as_deref(), start)?;

    let removed = state.registry.unsubscribe(deployer, &target);

    Ok(Json(ApiResponse::success(
        UnsubscribeData {
            deployer: to_lower_hex(&deployer),
            target_id: target,
            removed,
        },
        elapsed_ms(start),
    )))
}

pub async fn list_subscribers(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SubscribersParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SubscribersData>>, ApiFailure> {
    let start = Instant::now();

    let params = query_params(params, start)?;
    let deployer = required_address(params.deployer.as_deref(), "deployer", start)?;
    let mut subscribers: Vec<String> = state.registry.list_subscribers(deployer).into_iter().collect();
    subscribers.sort();

    Ok(Json(ApiResponse::success(
        SubscribersData {
            deployer: to_lower_hex(&deployer),
            subscribers,
        },
        elapsed_ms(start),
    )))
}

/// Fallback for unknown routes, in the same envelope
pub async fn not_found() -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(ApiError::route_not_found(), 0.0)),
    )
}

/// Known route, unsupported method
pub async fn method_not_allowed() -> ApiFailure {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::error(ApiError::method_not_allowed(), 0.0)),
    )
}
