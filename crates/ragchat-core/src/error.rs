use thiserror::Error;

/// Top-level error type for ragchat.
///
/// Backend failures during an exchange are not errors at this level: they are
/// values rendered to the user. This type covers startup and plumbing failures
/// that can actually stop a process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RagchatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<toml::de::Error> for RagchatError {
    fn from(err: toml::de::Error) -> Self {
        RagchatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RagchatError {
    fn from(err: toml::ser::Error) -> Self {
        RagchatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RagchatError {
    fn from(err: serde_json::Error) -> Self {
        RagchatError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for ragchat operations.
pub type Result<T> = std::result::Result<T, RagchatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RagchatError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = RagchatError::Server("bind failed".to_string());
        assert_eq!(err.to_string(), "Server error: bind failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RagchatError = io_err.into();
        assert!(matches!(err, RagchatError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_becomes_config_error() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: RagchatError = toml_err.into();
        assert!(matches!(err, RagchatError::Config(_)));
    }

    #[test]
    fn test_json_error_becomes_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: RagchatError = json_err.into();
        assert!(matches!(err, RagchatError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));
    }
}
