use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Error)]
pub enum SiteError {
    /// Empty or whitespace-only chat input. Rejected locally, nothing is sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A chat reply is still outstanding.
    #[error("the assistant is still answering the previous message")]
    BotBusy,

    #[error("unknown item `{0}`")]
    UnknownItem(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("service error: {0}")]
    Service(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl SiteError {
    /// True for the failures produced by the AI gateway.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(self, SiteError::Network(_) | SiteError::Service(_))
    }
}
