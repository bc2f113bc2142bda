//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so logs and API responses can be
//! correlated. Codes follow the pattern CATEGORY_SPECIFIC_ERROR:
//! - UPSTREAM_xxx: explorer / RPC failures (absorbed at strategy and lookup boundaries)
//! - API_xxx: request-level outcomes
//! - NOTIFY_xxx: notification transport failures
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Message that is safe to show to an API client.
    /// Internal errors never leak their detail.
    pub fn public_message(&self) -> String {
        match self.code {
            ErrorCode::Internal => "Internal Server Error".to_string(),
            _ => self.message.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Upstream Errors
    // ============================================
    /// Explorer or RPC call failed
    UpstreamUnavailable,
    /// Explorer or RPC call exceeded the per-call timeout
    UpstreamTimeout,
    /// Upstream answered with something we could not decode
    UpstreamInvalidResponse,

    // ============================================
    // Request Outcomes
    // ============================================
    /// Malformed address or missing field
    InvalidInput,
    /// Deployer could not be resolved by any strategy
    NotFound,
    /// Deployer known, but a later stage failed
    PartialResult,
    /// Unclassified failure
    Internal,

    // ============================================
    // Notification / Configuration
    // ============================================
    /// Notification transport rejected or failed the send
    NotificationFailed,
    /// Invalid configuration value
    ConfigInvalid,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamInvalidResponse => "UPSTREAM_INVALID_RESPONSE",
            Self::InvalidInput => "API_INVALID_INPUT",
            Self::NotFound => "API_NOT_FOUND",
            Self::PartialResult => "API_PARTIAL_RESULT",
            Self::Internal => "API_INTERNAL_ERROR",
            Self::NotificationFailed => "NOTIFY_FAILED",
            Self::ConfigInvalid => "CFG_INVALID_VALUE",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            _ => 500,
        }
    }

    /// Upstream failures are absorbed by the stage that issued the call
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable | Self::UpstreamTimeout | Self::UpstreamInvalidResponse
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, msg)
    }

    pub fn upstream_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamTimeout, msg)
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamInvalidResponse, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    pub fn notification_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotificationFailed, msg)
    }

    pub fn config_invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, msg)
    }
}

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Internal, err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::UpstreamTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::UpstreamUnavailable, "Connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::UpstreamInvalidResponse, "Malformed response body")
        } else {
            // reqwest errors can embed the request URL (and with it an API key)
            Self::new(
                ErrorCode::UpstreamUnavailable,
                format!("Request failed: {}", err.without_url()),
            )
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::UpstreamInvalidResponse, "JSON parse error", err)
    }
}
