//! Core error types for mgit.

/// Rule store and path expansion errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No rule store exists at the resolved location.
    #[error("config not found at {path}")]
    NotFound {
        /// Path that was probed.
        path: String,
    },

    /// Failed to read the rule store.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path of the config file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The rule store is not valid JSON or has the wrong shape.
    #[error("failed to parse config {path}: {message}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// A path reference could not be expanded.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The current working directory could not be determined.
    #[error("cannot determine current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

impl ConfigError {
    /// Whether the rule store was simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_not_found() {
        let err = ConfigError::NotFound {
            path: "/repo/.mgit/config.json".to_string(),
        };
        assert_eq!(err.to_string(), "config not found at /repo/.mgit/config.json");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_should_display_parse_error() {
        let err = ConfigError::Parse {
            path: "/repo/.mgit/config.json".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/repo/.mgit/config.json"));
        assert!(msg.contains("expected value"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_should_display_read_file_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = ConfigError::ReadFile {
            path: "/etc/mgit/config.json".to_string(),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/mgit/config.json"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_should_display_invalid_path() {
        let err = ConfigError::InvalidPath("empty path".to_string());
        assert_eq!(err.to_string(), "invalid path: empty path");
    }
}
