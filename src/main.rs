use anyhow::Context;
use clap::Parser;
use colored::*;
use github_portfolio::cli::Cli;
use github_portfolio::dom::selectors;
use github_portfolio::repositories::RepoLoadOutcome;
use github_portfolio::stats::StatsOutcome;
use github_portfolio::{share, Host, Page, Portfolio};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
struct RenderReport {
    username: String,
    status: Option<String>,
    repositories: String,
    cards: usize,
    stats: StatsView,
    grid_html: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatsView {
    outcome: String,
    public_repos: Option<String>,
    followers: Option<String>,
    stars: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout carries the rendered output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.to_config()?;

    let page = match &cli.template {
        Some(path) => {
            let html = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            Page::parse(&html)
        }
        None => Page::default(),
    };

    let host = share(page);
    let (portfolio, load) = Portfolio::start(config, host.clone()).await?;
    let success = load.is_success();
    portfolio.shutdown().await;

    let page = host.lock().await;
    let grid = page.query(selectors::GRID);
    let grid_html = grid.and_then(|g| page.inner_html(g));
    let text_of = |selector: &str| page.query(selector).and_then(|el| page.text(el));

    let report = RenderReport {
        username: cli.username.clone(),
        status: text_of(selectors::STATUS),
        repositories: match &load.repositories {
            RepoLoadOutcome::Skipped => "skipped".to_string(),
            RepoLoadOutcome::Empty => "empty".to_string(),
            RepoLoadOutcome::Rendered(_) => "rendered".to_string(),
            RepoLoadOutcome::Failed(e) => format!("failed: {}", e),
        },
        cards: match load.repositories {
            RepoLoadOutcome::Rendered(n) => n,
            _ => 0,
        },
        stats: StatsView {
            outcome: match &load.stats {
                StatsOutcome::Skipped => "skipped".to_string(),
                StatsOutcome::Updated(_) => "updated".to_string(),
                StatsOutcome::Failed(e) => format!("failed: {}", e),
            },
            public_repos: text_of(selectors::STAT_REPOS),
            followers: text_of(selectors::STAT_FOLLOWERS),
            stars: text_of(selectors::STAT_STARS),
        },
        grid_html,
    };
    drop(page);

    if let (Some(path), Some(markup)) = (&cli.output, &report.grid_html) {
        tokio::fs::write(path, markup)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, cli.output.is_none());
    }

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &RenderReport, include_markup: bool) {
    println!("{}", format!("GitHub portfolio for @{}", report.username).bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let status = report.status.as_deref().unwrap_or("");
    if report.repositories.starts_with("failed") {
        println!("❌ {}", status.red());
    } else {
        println!("✅ {}", status);
    }

    let placeholder = || "—".to_string();
    println!("\n📊 Stats ({}):", report.stats.outcome);
    println!("   Repos: {}", report.stats.public_repos.clone().unwrap_or_else(placeholder));
    println!("   Followers: {}", report.stats.followers.clone().unwrap_or_else(placeholder));
    println!("   Stars: {}", report.stats.stars.clone().unwrap_or_else(placeholder));

    if include_markup {
        if let Some(markup) = &report.grid_html {
            println!("\n{}", "Project grid:".bold());
            println!("{}", markup.trim());
        }
    }
}
