use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("Malformed input in {match_id}: {reason}")]
    MalformedInput { match_id: String, reason: String },

    #[error("Failed to persist {match_id}: {source}")]
    Persistence {
        match_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to publish notification for {match_id}: {message}")]
    Notification { match_id: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("Notification channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlattenError {
    pub fn malformed(match_id: impl Into<String>, reason: impl Into<String>) -> Self {
        FlattenError::MalformedInput {
            match_id: match_id.into(),
            reason: reason.into(),
        }
    }

    /// Stable short name used in batch summaries and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FlattenError::MalformedInput { .. } => "malformed_input",
            FlattenError::Persistence { .. } => "persistence",
            FlattenError::Notification { .. } => "notification",
            FlattenError::Config(_) => "config",
            FlattenError::Storage(_) => "storage",
            FlattenError::ChannelUnavailable(_) => "channel_unavailable",
            FlattenError::Json(_) => "json",
            FlattenError::Toml(_) => "toml",
            FlattenError::Io(_) => "io",
        }
    }

    /// Errors that abort the whole batch rather than a single match.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FlattenError::Config(_) | FlattenError::Storage(_) | FlattenError::ChannelUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FlattenError>;
