use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("GitHub API request failed with status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PortfolioError {
    /// HTTP status code carried by a non-success response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortfolioError::HttpStatus { status, .. } => Some(*status),
            PortfolioError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
