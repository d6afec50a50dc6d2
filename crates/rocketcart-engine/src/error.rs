//! # Engine Error Types
//!
//! Errors raised while wiring and running the engine. Cart operations
//! themselves fail with [`rocketcart_core::CartError`]; this type covers
//! everything around them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │  Configuration                  │  │  Runtime                    │  │
//! │  │                                 │  │                             │  │
//! │  │  InvalidConfig                  │  │  HttpClient                 │  │
//! │  │  InvalidUrl                     │  │                             │  │
//! │  │  ConfigLoadFailed               │  │                             │  │
//! │  │  ConfigSaveFailed               │  │                             │  │
//! │  └─────────────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid inventory service URL.
    #[error("Invalid inventory URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for EngineError {
    fn from(err: url::ParseError) -> Self {
        EngineError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::HttpClient(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

impl From<rocketcart_core::ValidationError> for EngineError {
    fn from(err: rocketcart_core::ValidationError) -> Self {
        EngineError::InvalidConfig(err.to_string())
    }
}

impl EngineError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_)
                | EngineError::InvalidUrl(_)
                | EngineError::ConfigLoadFailed(_)
                | EngineError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_categorization() {
        assert!(EngineError::InvalidConfig("x".into()).is_config_error());
        assert!(EngineError::InvalidUrl("x".into()).is_config_error());
        assert!(EngineError::ConfigLoadFailed("x".into()).is_config_error());
        assert!(!EngineError::HttpClient("no tls backend".into()).is_config_error());
    }

    #[test]
    fn test_url_parse_error_converts() {
        let err: EngineError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, EngineError::InvalidUrl(_)));
    }
}
