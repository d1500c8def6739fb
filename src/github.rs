use crate::config::PortfolioConfig;
use crate::error::{PortfolioError, Result};
use crate::types::{GitHubAccount, GitHubRepo, RepoSort};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

const PER_PAGE: u32 = 100;

/// Anonymous client for the public GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(config: &PortfolioConfig) -> Result<Self> {
        if config.api_base_url.cannot_be_a_base() {
            return Err(PortfolioError::InvalidBaseUrl(config.api_base_url.to_string()));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(GitHubClient {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Builds `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortfolioError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // One attempt per call; no retry and no rate-limit waiting.
    async fn make_request(&self, url: Url) -> Result<Response> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        let rate_limit_remaining = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok());

        debug!(
            url = %url,
            status = response.status().as_u16(),
            ?rate_limit_remaining,
            "GitHub API response"
        );

        if !response.status().is_success() {
            return Err(PortfolioError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.make_request(url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// First page (100 entries) of a user's public repositories.
    pub async fn list_user_repositories(
        &self,
        username: &str,
        sort: Option<RepoSort>,
    ) -> Result<Vec<GitHubRepo>> {
        let mut url = self.endpoint(&["users", username, "repos"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("per_page", &PER_PAGE.to_string());
            if let Some(sort) = sort {
                query.append_pair("sort", sort.as_str());
            }
        }

        self.get_json(url).await
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubAccount> {
        let url = self.endpoint(&["users", username])?;
        self.get_json(url).await
    }
}
