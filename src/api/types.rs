//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::errors::AppError;

/// API Response wrapper
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            code: "METHOD_NOT_ALLOWED".to_string(),
            message: "Method not allowed".to_string(),
        }
    }

    pub fn route_not_found() -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: "Route not found".to_string(),
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.public_message(),
        }
    }
}

// ============================================
// Analysis
// ============================================

/// `GET /analyze?address=0x...`
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    #[serde(default)]
    pub address: Option<String>,
}

// ============================================
// Monitoring
// ============================================

/// `POST /monitor` and `DELETE /monitor` body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRequest {
    #[serde(default)]
    pub deployer: Option<String>,
    #[serde(default, alias = "chatId")]
    pub target_id: Option<String>,
}

/// `GET /monitor?deployer=0x...`
#[derive(Debug, Default, Deserialize)]
pub struct SubscribersParams {
    #[serde(default)]
    pub deployer: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorData {
    pub deployer: String,
    pub target_id: String,
    /// `false` when the pair was already registered
    pub newly_added: bool,
    pub notified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeData {
    pub deployer: String,
    pub target_id: String,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribersData {
    pub deployer: String,
    /// Sorted for stable output
    pub subscribers: Vec<String>,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub chain: String,
    pub watched_deployers: usize,
    pub notifications_enabled: bool,
}
