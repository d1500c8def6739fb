use crate::error::{PortfolioError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_USERNAME: &str = "meet-innovate";
pub const DEFAULT_MAX_REPOS: usize = 6;
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "GitHub Portfolio/0.1.0";
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Values the fetchers and the animation loop receive explicitly.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    pub username: String,
    pub max_repos: usize,
    pub api_base_url: Url,
    pub user_agent: String,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub frame_interval: Duration,
}

impl PortfolioConfig {
    pub fn new(username: impl Into<String>, max_repos: usize) -> Result<Self> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(PortfolioError::ConfigError("username must not be empty".to_string()));
        }

        Ok(Self {
            username,
            max_repos,
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)?,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        })
    }

    pub fn with_api_base_url(mut self, base: &str) -> Result<Self> {
        let url = Url::parse(base)?;
        if url.cannot_be_a_base() {
            return Err(PortfolioError::InvalidBaseUrl(base.to_string()));
        }
        self.api_base_url = url;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }
}
