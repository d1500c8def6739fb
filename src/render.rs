use crate::format::{escape_html, format_date};
use crate::types::GitHubRepo;

pub const DESCRIPTION_FALLBACK: &str = "No description yet.";
pub const LANGUAGE_FALLBACK: &str = "Project";

/// Drops forks and archived repositories, orders the rest by push time
/// (most recent first, stable for ties, missing times last) and keeps at
/// most `max` of them.
pub fn select_repositories(repos: Vec<GitHubRepo>, max: usize) -> Vec<GitHubRepo> {
    let mut eligible: Vec<GitHubRepo> = repos.into_iter().filter(GitHubRepo::is_eligible).collect();
    eligible.sort_by(|a, b| b.pushed_at().cmp(&a.pushed_at()));
    eligible.truncate(max);
    eligible
}

pub fn render_card(repo: &GitHubRepo) -> String {
    let name = escape_html(Some(&repo.name));
    let description = escape_html(Some(repo.description.as_deref().unwrap_or(DESCRIPTION_FALLBACK)));
    let language = escape_html(Some(repo.language.as_deref().unwrap_or(LANGUAGE_FALLBACK)));
    let updated = format_date(repo.pushed_at.as_deref());
    let stars = repo.stars();

    let demo_link = repo
        .homepage()
        .map(|homepage| {
            format!(
                r#"<a class="btn btn-small" href="{}" target="_blank" rel="noreferrer">Demo</a>"#,
                escape_html(Some(homepage))
            )
        })
        .unwrap_or_default();

    format!(
        r#"
<article class="card reveal">
  <h3>{name}</h3>
  <p class="muted">{description}</p>
  <div class="tags">
    <span>{language}</span>
    <span>★ {stars}</span>
    <span>Updated {updated}</span>
  </div>
  <div class="card-actions">
    {demo_link}
    <a class="btn btn-small btn-ghost" href="{code}" target="_blank" rel="noreferrer">Code</a>
  </div>
</article>
"#,
        code = escape_html(Some(&repo.html_url)),
    )
}

/// All cards concatenated, ready for a single grid assignment.
pub fn render_cards(repos: &[GitHubRepo]) -> String {
    repos.iter().map(render_card).collect()
}
