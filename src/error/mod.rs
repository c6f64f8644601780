use thiserror::Error;

pub mod retry;

pub type Result<T> = std::result::Result<T, Error>;

// Re-export retry logic
pub use retry::{RetryOutcome, RetryableError};

/// Main error type for the adapter layer
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    /// Backend reported loss of the session (server gone away, lost connection)
    #[error("Transient backend error{}: {message}", fmt_code(.code))]
    TransientBackend { code: Option<u16>, message: String },

    #[error("Backend error{}: {message}", fmt_code(.code))]
    Backend { code: Option<u16>, message: String },

    #[error("Unknown column type: {0}")]
    UnknownType(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid column definition: {0}")]
    InvalidColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "config")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn fmt_code(code: &Option<u16>) -> String {
    match code {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

impl Error {
    pub fn not_connected(msg: impl Into<String>) -> Self {
        Self::NotConnected(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn transient(code: Option<u16>, msg: impl Into<String>) -> Self {
        Self::TransientBackend {
            code,
            message: msg.into(),
        }
    }

    pub fn backend(code: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Backend {
            code,
            message: msg.into(),
        }
    }

    pub fn unknown_type(tag: impl Into<String>) -> Self {
        Self::UnknownType(tag.into())
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    pub fn invalid_column(msg: impl Into<String>) -> Self {
        Self::InvalidColumn(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error signals a lost session that a fresh connection may fix
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::TransientBackend { .. })
    }

    /// Backend error code, when the backend supplied one
    pub fn backend_code(&self) -> Option<u16> {
        match self {
            Error::TransientBackend { code, .. } | Error::Backend { code, .. } => *code,
            _ => None,
        }
    }

    /// Short machine-readable identifier for the error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::NotConnected(_) => "NOT_CONNECTED",
            Error::Connection(_) => "CONNECTION_ERROR",
            Error::TransientBackend { .. } => "TRANSIENT_BACKEND_ERROR",
            Error::Backend { .. } => "BACKEND_ERROR",
            Error::UnknownType(_) => "UNKNOWN_TYPE",
            Error::InvalidQuery(_) => "INVALID_QUERY",
            Error::InvalidColumn(_) => "INVALID_COLUMN",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            #[cfg(feature = "config")]
            Error::Toml(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::transient(Some(2006), "MySQL server has gone away").is_transient());
        assert!(!Error::backend(Some(1064), "syntax error").is_transient());
        assert!(!Error::not_connected("no handle").is_transient());
    }

    #[test]
    fn test_display_includes_code() {
        let err = Error::backend(Some(1146), "Table 'app.nope' doesn't exist");
        assert_eq!(
            err.to_string(),
            "Backend error (1146): Table 'app.nope' doesn't exist"
        );

        let err = Error::transient(None, "broken pipe");
        assert_eq!(err.to_string(), "Transient backend error: broken pipe");
    }

    #[test]
    fn test_backend_code() {
        assert_eq!(Error::transient(Some(2013), "lost").backend_code(), Some(2013));
        assert_eq!(Error::unknown_type("money").backend_code(), None);
        assert_eq!(Error::unknown_type("money").error_code(), "UNKNOWN_TYPE");
    }
}
