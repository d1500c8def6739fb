use crate::dom::{selectors, ElementId, Host, SharedHost};
use crate::error::{PortfolioError, Result};
use crate::github::GitHubClient;
use crate::interaction::RevealObserver;
use crate::render::{render_cards, select_repositories};
use crate::types::RepoSort;
use tracing::{debug, error, info};

pub const STATUS_LOADING: &str = "Loading GitHub projects…";
pub const STATUS_EMPTY: &str = "No public repos found.";
pub const STATUS_FAILED: &str = "Couldn’t load GitHub projects right now.";

pub fn status_showing(count: usize, username: &str) -> String {
    format!("Showing {} recent repos from @{}.", count, username)
}

/// How a repository load ended. Failures never escape as `Err`.
#[derive(Debug)]
pub enum RepoLoadOutcome {
    /// Grid or status element missing; nothing was fetched.
    Skipped,
    Empty,
    Rendered(usize),
    Failed(PortfolioError),
}

impl RepoLoadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RepoLoadOutcome::Empty | RepoLoadOutcome::Rendered(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RepoLoadOutcome::Failed(_))
    }
}

/// Fetches `username`'s repositories and renders up to `max_repos` cards
/// into the project grid.
pub async fn load_repositories<H: Host>(
    client: &GitHubClient,
    host: &SharedHost<H>,
    reveal: &RevealObserver,
    username: &str,
    max_repos: usize,
) -> RepoLoadOutcome {
    let (grid, status) = {
        let mut page = host.lock().await;
        let (Some(grid), Some(status)) = (page.query(selectors::GRID), page.query(selectors::STATUS))
        else {
            return RepoLoadOutcome::Skipped;
        };
        page.set_text(status, STATUS_LOADING);
        (grid, status)
    };

    match fetch_and_render(client, host, reveal, grid, username, max_repos).await {
        Ok(0) => {
            host.lock().await.set_text(status, STATUS_EMPTY);
            info!(username, "No public repositories to show");
            RepoLoadOutcome::Empty
        }
        Ok(count) => {
            host.lock().await.set_text(status, &status_showing(count, username));
            info!(username, count, "Rendered repository cards");
            RepoLoadOutcome::Rendered(count)
        }
        Err(e) => {
            error!(username, status = ?e.status(), "Failed to load repositories: {}", e);
            host.lock().await.set_text(status, STATUS_FAILED);
            RepoLoadOutcome::Failed(e)
        }
    }
}

// The grid is only written after the whole response has been parsed.
async fn fetch_and_render<H: Host>(
    client: &GitHubClient,
    host: &SharedHost<H>,
    reveal: &RevealObserver,
    grid: ElementId,
    username: &str,
    max_repos: usize,
) -> Result<usize> {
    let repos = client
        .list_user_repositories(username, Some(RepoSort::Pushed))
        .await?;
    let fetched = repos.len();
    let selected = select_repositories(repos, max_repos);
    debug!(username, fetched, selected = selected.len(), "Filtered repositories");

    if selected.is_empty() {
        return Ok(0);
    }

    let markup = render_cards(&selected);
    let mut page = host.lock().await;
    page.set_inner_html(grid, &markup);
    reveal.observe_within(&mut *page, grid);

    Ok(selected.len())
}
