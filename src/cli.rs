use crate::config::{PortfolioConfig, DEFAULT_API_BASE_URL, DEFAULT_MAX_REPOS, DEFAULT_USERNAME};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "github-portfolio")]
#[command(about = "Pre-renders a portfolio page's GitHub projects and live stats")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub user whose repositories and stats are shown
    #[arg(long, env = "GITHUB_USERNAME", default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// Maximum number of repository cards
    #[arg(long, env = "MAX_REPOS", default_value_t = DEFAULT_MAX_REPOS)]
    pub max_repos: usize,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Per-request timeout in seconds (unbounded when omitted)
    #[arg(long, env = "GITHUB_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent to GitHub
    #[arg(long)]
    pub user_agent: Option<String>,

    /// HTML page to render into (defaults to the built-in skeleton)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Write the rendered project grid markup to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn to_config(&self) -> Result<PortfolioConfig> {
        let mut config = PortfolioConfig::new(self.username.clone(), self.max_repos)?
            .with_api_base_url(&self.api_base_url)?
            .with_request_timeout(self.timeout_secs.map(Duration::from_secs));
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }
        Ok(config)
    }
}
