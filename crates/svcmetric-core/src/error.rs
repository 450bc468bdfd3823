//! Shared error types across svcmetric crates.

use thiserror::Error;

use crate::method::MethodIdentity;

/// Stable error codes, usable in logs and assertions without matching on
/// payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Intercepted method carries no metric metadata.
    MissingMetadata,
    /// Metric name does not resolve in the registry.
    UnknownMetric,
    /// Settings could not be read or parsed.
    BadSettings,
    /// Unsupported settings version.
    UnsupportedVersion,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingMetadata => "MISSING_METADATA",
            ErrorCode::UnknownMetric => "UNKNOWN_METRIC",
            ErrorCode::BadSettings => "BAD_SETTINGS",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Result of metric resolution.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// An instrumented method could not be bound to a metric.
///
/// Both variants are programming/configuration defects: they are never
/// retried internally and block the intercepted call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("method {method} is intercepted but declares no metric")]
    MissingMetadata { method: MethodIdentity },
    #[error("metric {name:?} is not registered")]
    UnknownMetric { name: String },
}

impl ConfigurationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigurationError::MissingMetadata { .. } => ErrorCode::MissingMetadata,
            ConfigurationError::UnknownMetric { .. } => ErrorCode::UnknownMetric,
        }
    }
}

/// Error returned from an intercepted call.
///
/// `Delegate` holds the wrapped body's own error value, untouched.
#[derive(Debug, Error)]
pub enum InterceptError<E> {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("{0}")]
    Delegate(E),
}

impl<E> InterceptError<E> {
    pub fn is_configuration(&self) -> bool {
        matches!(self, InterceptError::Configuration(_))
    }

    /// The wrapped body's error, if that is what failed.
    pub fn into_delegate(self) -> Option<E> {
        match self {
            InterceptError::Delegate(e) => Some(e),
            InterceptError::Configuration(_) => None,
        }
    }
}

/// Interceptor settings failed to load.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("read settings failed: {0}")]
    Read(String),
    #[error("invalid yaml: {0}")]
    InvalidYaml(String),
    #[error("unsupported settings version: {0}")]
    UnsupportedVersion(u32),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

impl SettingsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SettingsError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            SettingsError::Read(_) | SettingsError::InvalidYaml(_) | SettingsError::Invalid(_) => {
                ErrorCode::BadSettings
            }
        }
    }
}
