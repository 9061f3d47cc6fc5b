pub const CONNECTIVITY_MESSAGE: &str = "Could not connect to backend. Is the API server running?";
pub const UNKNOWN_BACKEND_ERROR: &str = "Unknown backend error";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend reported an error: {0}")]
    Backend(String),
}

impl FetchError {
    /// Text shown in the runs table for this failure.
    pub fn user_message(&self) -> &str {
        match self {
            FetchError::Transport(_) => CONNECTIVITY_MESSAGE,
            FetchError::Backend(message) => message,
        }
    }
}
