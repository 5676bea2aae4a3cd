use thiserror::Error;

/// Main error type for git-wrapped
#[derive(Error, Debug)]
pub enum WrappedError {
    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GitHub answered with a non-success status
    #[error("GitHub API error ({status}): {message}")]
    GitHubApi { status: u16, message: String },

    /// Caching errors
    #[error("Cache error: {0}")]
    Cache(#[from] sled::Error),

    /// Invalid command-line or API argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Part of a fetch failed where the whole result is required
    #[error("Incomplete fetch: {0}")]
    Incomplete(String),
}

/// Result type alias for git-wrapped operations
pub type Result<T> = std::result::Result<T, WrappedError>;

impl WrappedError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new GitHub API error
    pub fn github_api<S: Into<String>>(status: u16, msg: S) -> Self {
        Self::GitHubApi {
            status,
            message: msg.into(),
        }
    }

    /// Create a new invalid-argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new incomplete-fetch error
    pub fn incomplete<S: Into<String>>(msg: S) -> Self {
        Self::Incomplete(msg.into())
    }

    /// Whether GitHub rejected the credentials
    pub fn is_bad_credentials(&self) -> bool {
        matches!(self, Self::GitHubApi { status: 401, .. })
    }

    /// Whether GitHub refused the request because of rate limiting
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::GitHubApi { status, message } => {
                *status == 429 || (*status == 403 && message.to_lowercase().contains("rate limit"))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(WrappedError::github_api(401, "Bad credentials").is_bad_credentials());
        assert!(WrappedError::github_api(403, "API rate limit exceeded").is_rate_limited());
        assert!(WrappedError::github_api(429, "").is_rate_limited());
        assert!(!WrappedError::github_api(404, "Not Found").is_rate_limited());
        assert!(!WrappedError::config("bad").is_bad_credentials());
    }

    #[test]
    fn test_error_display() {
        let err = WrappedError::github_api(404, "Not Found");
        assert_eq!(err.to_string(), "GitHub API error (404): Not Found");

        let err = WrappedError::incomplete("commit listing task panicked");
        assert_eq!(err.to_string(), "Incomplete fetch: commit listing task panicked");
    }
}
