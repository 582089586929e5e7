//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so it can be grepped in logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - SCAN_xxx: upstream scan service (the only user-visible failures)
//! - STORE_xxx: persistence adapter failures (logged, never surfaced)
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
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

    /// Text shown to the user when a scan cannot be completed
    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::ScanRejected | ErrorCode::ScanBadRequest => {
                format!("Scan failed: {}", self.message)
            }
            ErrorCode::ScanTimeout => "Scan failed: the scan service timed out".to_string(),
            ErrorCode::ScanConnectionFailed => {
                "Scan failed: could not reach the scan service".to_string()
            }
            ErrorCode::ScanInvalidResponse => {
                "Scan failed: the scan service returned an unreadable result".to_string()
            }
            _ => "An unexpected error occurred.".to_string(),
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
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Scan Service Errors (1xx)
    // ============================================
    /// Could not connect to the scan service
    ScanConnectionFailed,
    /// Scan request timed out
    ScanTimeout,
    /// Scan service answered with a non-success status
    ScanRejected,
    /// Scan service answered with an unparseable body
    ScanInvalidResponse,
    /// Request refused locally (e.g. blank URL)
    ScanBadRequest,

    // ============================================
    // Persistence Errors (2xx)
    // ============================================
    /// Value could not be written
    StoreWriteFailed,
    /// Value could not be serialized
    StoreSerializeFailed,

    // ============================================
    // Configuration Errors (4xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Scan Service Errors
            Self::ScanConnectionFailed => "SCAN_CONNECTION_FAILED",
            Self::ScanTimeout => "SCAN_TIMEOUT",
            Self::ScanRejected => "SCAN_REJECTED",
            Self::ScanInvalidResponse => "SCAN_INVALID_RESPONSE",
            Self::ScanBadRequest => "SCAN_BAD_REQUEST",

            // Persistence Errors
            Self::StoreWriteFailed => "STORE_WRITE_FAILED",
            Self::StoreSerializeFailed => "STORE_SERIALIZE_FAILED",

            // Configuration Errors
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Upstream failures are the only ones shown to the user
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::ScanConnectionFailed
                | Self::ScanTimeout
                | Self::ScanRejected
                | Self::ScanInvalidResponse
                | Self::ScanBadRequest
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Scan service returned a non-success status
    pub fn scan_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScanRejected, msg)
    }

    /// Scan request timed out
    pub fn scan_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScanTimeout, msg)
    }

    /// Scan request refused before sending
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScanBadRequest, msg)
    }

    /// Store write failed
    pub fn store_write(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreWriteFailed, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::StoreWriteFailed, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::ScanTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::ScanConnectionFailed, "Connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::ScanInvalidResponse, err.to_string())
        } else {
            Self::new(ErrorCode::ScanConnectionFailed, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::StoreSerializeFailed, "JSON error", err)
    }
}
