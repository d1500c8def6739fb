use crate::dom::{selectors, Host, SharedHost};
use crate::error::{PortfolioError, Result};
use crate::github::GitHubClient;
use crate::types::PortfolioStats;
use tracing::{info, warn};

pub const PLACEHOLDER: &str = "—";

/// How a stats load ended. On failure no field is written.
#[derive(Debug)]
pub enum StatsOutcome {
    /// One of the stat fields is missing; nothing was fetched.
    Skipped,
    Updated(PortfolioStats),
    Failed(PortfolioError),
}

impl StatsOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StatsOutcome::Updated(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StatsOutcome::Failed(_))
    }
}

/// Fetches the account and its first 100 repositories, then writes repo,
/// follower and star counts.
pub async fn load_stats<H: Host>(
    client: &GitHubClient,
    host: &SharedHost<H>,
    username: &str,
) -> StatsOutcome {
    let fields = {
        let page = host.lock().await;
        (
            page.query(selectors::STAT_REPOS),
            page.query(selectors::STAT_FOLLOWERS),
            page.query(selectors::STAT_STARS),
        )
    };
    let (Some(repos_el), Some(followers_el), Some(stars_el)) = fields else {
        return StatsOutcome::Skipped;
    };

    match fetch_stats(client, username).await {
        Ok(stats) => {
            let mut page = host.lock().await;
            page.set_text(repos_el, &display_count(stats.public_repos));
            page.set_text(followers_el, &display_count(stats.followers));
            page.set_text(stars_el, &stats.total_stars.to_string());
            info!(
                username,
                public_repos = ?stats.public_repos,
                followers = ?stats.followers,
                total_stars = stats.total_stars,
                "Updated GitHub stats"
            );
            StatsOutcome::Updated(stats)
        }
        Err(e) => {
            warn!(username, "GitHub stats failed: {}", e);
            StatsOutcome::Failed(e)
        }
    }
}

async fn fetch_stats(client: &GitHubClient, username: &str) -> Result<PortfolioStats> {
    let account = client.get_user(username).await?;
    let repos = client.list_user_repositories(username, None).await?;

    Ok(PortfolioStats {
        public_repos: account.public_repos,
        followers: account.followers,
        total_stars: repos
            .iter()
            .fold(0u64, |total, r| total.saturating_add(r.stars())),
    })
}

fn display_count(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}
