use crate::config::PortfolioConfig;
use crate::dom::{selectors, Host, SharedHost};
use crate::error::Result;
use crate::events::UiEvent;
use crate::github::GitHubClient;
use crate::interaction::{AnimationHandle, Interactions};
use crate::repositories::{load_repositories, RepoLoadOutcome};
use crate::stats::{load_stats, StatsOutcome};
use chrono::Datelike;
use futures::future::join;
use tracing::info;

/// Outcome of one pass of both fetchers.
#[derive(Debug)]
pub struct LoadReport {
    pub repositories: RepoLoadOutcome,
    pub stats: StatsOutcome,
}

impl LoadReport {
    /// `true` unless a section failed; skipped sections count as fine.
    pub fn is_success(&self) -> bool {
        !self.repositories.is_failed() && !self.stats.is_failed()
    }
}

/// A mounted portfolio page: interactions attached, cursor loop running.
pub struct Portfolio<H: Host + 'static> {
    config: PortfolioConfig,
    client: GitHubClient,
    host: SharedHost<H>,
    interactions: Interactions,
    animation: Option<AnimationHandle>,
}

impl<H: Host + 'static> Portfolio<H> {
    /// Sets the footer year, wires interactions and starts the cursor loop.
    /// Must be called inside a tokio runtime.
    pub async fn mount(config: PortfolioConfig, host: SharedHost<H>) -> Result<Self> {
        let client = GitHubClient::new(&config)?;

        let interactions = {
            let mut page = host.lock().await;
            set_footer_year(&mut *page);
            Interactions::attach(&mut *page)
        };

        let animation = interactions
            .cursor()
            .map(|cursor| cursor.spawn(host.clone(), config.frame_interval));

        info!(username = %config.username, max_repos = config.max_repos, "Portfolio mounted");

        Ok(Self {
            config,
            client,
            host,
            interactions,
            animation,
        })
    }

    /// Mounts the page and runs both fetchers once.
    pub async fn start(config: PortfolioConfig, host: SharedHost<H>) -> Result<(Self, LoadReport)> {
        let portfolio = Self::mount(config, host).await?;
        let report = portfolio.load().await;
        Ok((portfolio, report))
    }

    /// Runs the repository and stats fetchers concurrently. Each handles its
    /// own failure; one failing does not affect the other.
    pub async fn load(&self) -> LoadReport {
        let username = self.config.username.as_str();
        let (repositories, stats) = join(
            load_repositories(
                &self.client,
                &self.host,
                self.interactions.reveal(),
                username,
                self.config.max_repos,
            ),
            load_stats(&self.client, &self.host, username),
        )
        .await;

        LoadReport {
            repositories,
            stats,
        }
    }

    pub async fn dispatch(&self, event: UiEvent) -> usize {
        let mut page = self.host.lock().await;
        self.interactions.dispatch(&mut *page, &event)
    }

    pub fn host(&self) -> &SharedHost<H> {
        &self.host
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    pub fn interactions(&self) -> &Interactions {
        &self.interactions
    }

    pub fn animation(&self) -> Option<&AnimationHandle> {
        self.animation.as_ref()
    }

    /// Cancels the cursor loop and drops every event subscription.
    pub async fn shutdown(mut self) {
        if let Some(animation) = self.animation.take() {
            animation.cancel().await;
        }
        self.interactions.detach();
        info!("Portfolio shut down");
    }
}

/// Writes the host clock's year into the footer, if present.
pub fn set_footer_year<H: Host + ?Sized>(host: &mut H) {
    if let Some(year) = host.query(selectors::YEAR) {
        let now = host.now();
        host.set_text(year, &now.year().to_string());
    }
}
