use thiserror::Error;

/// Failure talking to (or decoding the reply of) an upstream market-data provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
        timeout: bool,
    },

    #[error("{provider} sent a malformed payload: {message}")]
    Payload {
        provider: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub fn provider(&self) -> &'static str {
        match self {
            UpstreamError::Status { provider, .. }
            | UpstreamError::Transport { provider, .. }
            | UpstreamError::Payload { provider, .. } => provider,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport { timeout: true, .. })
    }

    /// Whether a later attempt with the same parameters may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Transport { .. } => true,
            UpstreamError::Status { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::Payload { .. } => false,
        }
    }

    pub(crate) fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        UpstreamError::Transport {
            provider,
            message: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("failed to compute {key}: {source}")]
    CacheCompute {
        key: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{0}")]
    Unavailable(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl Error {
    pub fn cache_compute(key: impl ToString, source: Error) -> Self {
        Error::CacheCompute {
            key: key.to_string(),
            source: Box::new(source),
        }
    }

    /// Innermost error, looking through cache-compute wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::CacheCompute { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
