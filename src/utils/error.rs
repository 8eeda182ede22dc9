use thiserror::Error;

#[derive(Error, Debug)]
pub enum BioverseError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream {source_name} returned an error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    UpstreamError {
        source_name: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl BioverseError {
    pub fn upstream(source_name: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            source_name: source_name.to_string(),
            status,
            message: message.into(),
        }
    }

    /// True when the caller's input was rejected.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// True when the service itself is misconfigured. Never the caller's fault.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::UpstreamError { .. } => {
                format!("Could not reach a biodiversity data source: {}", self)
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                format!("The configuration is not valid: {}", self)
            }
            Self::ValidationError { message } => format!("Invalid request: {}", message),
            Self::IoError(_) | Self::SerializationError(_) => {
                format!("Internal error: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) | Self::UpstreamError { .. } => {
                "Check network connectivity and the GBIF base URL, then try again"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the offending value in the config file or command-line flags"
            }
            Self::ValidationError { .. } => "Use a two-letter ISO country code such as BR or US",
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "Report this as a bug",
        }
    }
}

pub type Result<T> = std::result::Result<T, BioverseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_includes_status() {
        let err = BioverseError::upstream("GBIF", Some(503), "occurrence search failed");
        assert_eq!(
            err.to_string(),
            "Upstream GBIF returned an error (HTTP 503): occurrence search failed"
        );

        let err = BioverseError::upstream("IUCN", None, "timeout");
        assert_eq!(err.to_string(), "Upstream IUCN returned an error: timeout");
    }

    #[test]
    fn test_client_error_classification() {
        let err = BioverseError::ValidationError {
            message: "bad country".to_string(),
        };
        assert!(err.is_client_error());
        assert!(!BioverseError::upstream("GBIF", Some(500), "boom").is_client_error());
    }

    #[test]
    fn test_config_errors_are_not_client_errors() {
        let err = BioverseError::ConfigError {
            message: "base URL cannot be a base".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_client_error());

        let err = BioverseError::InvalidConfigValueError {
            field: "enrich_limit".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_client_error());
    }
}
