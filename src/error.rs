use thiserror::Error;

/// Why a request to the time service did not yield a usable body.
///
/// Both widgets collapse these into the same fallback; the split only exists
/// for logging and tests.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("undecodable response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ureq::Transport> for FetchError {
    fn from(err: ureq::Transport) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
