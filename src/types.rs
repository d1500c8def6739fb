use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// GitHub API response structures
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub stargazers_count: Option<u64>,
}

impl GitHubRepo {
    /// Push time, or `None` when missing or unparseable.
    pub fn pushed_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.pushed_at.as_deref())
    }

    /// Homepage URL; an empty string counts as no homepage.
    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref().filter(|h| !h.is_empty())
    }

    pub fn stars(&self) -> u64 {
        self.stargazers_count.unwrap_or(0)
    }

    pub fn is_eligible(&self) -> bool {
        !self.fork && !self.archived
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAccount {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
    #[serde(default)]
    pub followers: Option<u64>,
}

/// Aggregate numbers written into the stats fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioStats {
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub total_stars: u64,
}

/// Sort keys accepted by the user repositories endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSort {
    Pushed,
}

impl RepoSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoSort::Pushed => "pushed",
        }
    }
}

pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// Star counts that are missing, null or not a non-negative integer read as absent.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}
