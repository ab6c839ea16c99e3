use thiserror::Error;

/// Error type for all lprof operations.
#[derive(Error, Debug)]
pub enum LprofError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid time bound: {0}")]
    TimeBound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for lprof operations
pub type Result<T> = std::result::Result<T, LprofError>;

impl LprofError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Creates a new time bound error
    pub fn time_bound<S: Into<String>>(msg: S) -> Self {
        Self::TimeBound(msg.into())
    }

    /// Returns true if this error only invalidates a single record.
    ///
    /// A skip is permanent for that record; ingestion continues with the
    /// next one. Everything else aborts the run.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::TimeBound(_) | Self::Pattern(_) => "config",
            Self::Parse { .. } => "parse",
            Self::UnknownSortField(_) => "sort",
            Self::Io(_) => "io",
            Self::Yaml(_) => "serialization",
        }
    }
}
