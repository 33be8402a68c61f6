use thiserror::Error;

/// Errors raised while talking to an upstream or reading its answer
///
/// None of these escape a source client: every variant advances the cascade
/// to its next stage.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Upstream returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed body: {0}")]
    Decode(String),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("All {attempts} relays failed, last error: {last}")]
    RelayExhausted { attempts: usize, last: String },
}

impl FeedError {
    pub fn shape(msg: impl Into<String>) -> Self {
        FeedError::Shape(msg.into())
    }

    /// Body parsed as JSON but lacked what the caller needed
    pub fn is_shape(&self) -> bool {
        matches!(self, FeedError::Shape(_))
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
