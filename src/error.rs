//! Unified error handling for the key tools
//!
//! Every error carries a unique `KXXX` code for debugging and documentation,
//! grouped by concern, plus convenient constructor methods and automatic
//! conversions from common error types.

use std::fmt;
use thiserror::Error;

use crate::jwk::Violation;

/// Unified Result type for all key-tool operations
pub type Result<T> = std::result::Result<T, JwksError>;

/// Error codes for key-tool operations
///
/// - K1XX: User input errors
/// - K2XX: File and I/O errors
/// - K3XX: Validation and parsing errors
/// - K4XX: Cryptography and key errors
/// - K9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Input (K1XX)
    /// K101: Invalid input
    InvalidInput,

    // File/IO (K2XX)
    /// K201: File not found
    FileNotFound,
    /// K202: File read error
    FileReadError,
    /// K203: File write error
    FileWriteError,
    /// K204: Directory error
    DirectoryError,
    /// K205: File already exists
    FileAlreadyExists,

    // Validation (K3XX)
    /// K301: JWK failed schema validation
    JwkValidationFailed,
    /// K302: JSON parse error
    JsonParseError,

    // Cryptography (K4XX)
    /// K401: Key generation failed
    KeyGenerationFailed,

    // Internal (K9XX)
    /// K901: Internal error
    InternalError,
    /// K902: Serialization error
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            // Input (K1XX)
            ErrorCode::InvalidInput => 101,

            // File/IO (K2XX)
            ErrorCode::FileNotFound => 201,
            ErrorCode::FileReadError => 202,
            ErrorCode::FileWriteError => 203,
            ErrorCode::DirectoryError => 204,
            ErrorCode::FileAlreadyExists => 205,

            // Validation (K3XX)
            ErrorCode::JwkValidationFailed => 301,
            ErrorCode::JsonParseError => 302,

            // Cryptography (K4XX)
            ErrorCode::KeyGenerationFailed => 401,

            // Internal (K9XX)
            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }

    /// Get the string code (e.g., "K301")
    pub fn as_str(&self) -> String {
        format!("K{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K{}", self.code())
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for all key-tool operations
#[derive(Error, Debug)]
pub enum JwksError {
    /// Invalid user input
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A JSON value failed JWK schema validation; carries every field-level
    /// violation found, not just the first
    #[error("[{code}] Invalid JWK: {}", format_violations(.violations))]
    InvalidJwk {
        code: ErrorCode,
        violations: Vec<Violation>,
    },

    /// JSON(C) syntax error
    #[error("[{code}] Parse error: {message}")]
    Parse { code: ErrorCode, message: String },

    /// Key management error
    #[error("[{code}] Key error: {message}")]
    Key { code: ErrorCode, message: String },

    /// Resource already exists
    #[error("[{code}] Already exists: {resource}")]
    AlreadyExists { code: ErrorCode, resource: String },

    /// Serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl JwksError {
    /// Create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    /// Create IO error with context
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            code: ErrorCode::FileReadError,
            context: context.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create IO error from std::io::Error
    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            std::io::ErrorKind::AlreadyExists => ErrorCode::FileAlreadyExists,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create validation error aggregating all field-level violations
    pub fn invalid_jwk(violations: Vec<Violation>) -> Self {
        Self::InvalidJwk {
            code: ErrorCode::JwkValidationFailed,
            violations,
        }
    }

    /// Create JSON(C) parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            code: ErrorCode::JsonParseError,
            message: message.into(),
        }
    }

    /// Create key generation error
    pub fn key_generation(message: impl Into<String>) -> Self {
        Self::Key {
            code: ErrorCode::KeyGenerationFailed,
            message: message.into(),
        }
    }

    /// Create already exists error
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists {
            code: ErrorCode::FileAlreadyExists,
            resource: resource.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: message.into(),
            source: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::InvalidJwk { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Key { code, .. } => *code,
            Self::AlreadyExists { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// True for per-file defects the key-set builder skips instead of
    /// aborting on: schema violations and JSON(C) syntax errors
    pub fn is_key_file_defect(&self) -> bool {
        matches!(self, Self::InvalidJwk { .. } | Self::Parse { .. })
    }
}

impl From<std::io::Error> for JwksError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<serde_json::Error> for JwksError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}
