mod common;

use common::{repo, test_client, with_field, USERNAME};
use github_portfolio::dom::selectors;
use github_portfolio::stats::{load_stats, StatsOutcome, PLACEHOLDER};
use github_portfolio::types::PortfolioStats;
use github_portfolio::{share, Host, Page, PortfolioError, SharedHost};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_user(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{}", USERNAME)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn mock_repos(server: &MockServer, status: u16, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{}/repos", USERNAME)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn fields(host: &SharedHost<Page>) -> Vec<Option<String>> {
    let page = host.lock().await;
    [selectors::STAT_REPOS, selectors::STAT_FOLLOWERS, selectors::STAT_STARS]
        .iter()
        .map(|s| page.query(s).and_then(|el| page.text(el)))
        .collect()
}

fn placeholders() -> Vec<Option<String>> {
    vec![Some(PLACEHOLDER.to_string()); 3]
}

#[tokio::test]
async fn test_stats_sum_stars_and_write_fields() {
    let server = MockServer::start().await;
    mock_user(&server, 200, json!({ "login": USERNAME, "public_repos": 12, "followers": 34 })).await;
    mock_repos(
        &server,
        200,
        json!([
            with_field(repo("a", "2024-01-01T00:00:00Z"), "stargazers_count", json!(5)),
            with_field(repo("b", "2024-01-01T00:00:00Z"), "stargazers_count", Value::Null),
            with_field(repo("c", "2024-01-01T00:00:00Z"), "stargazers_count", json!("many")),
            with_field(repo("d", "2024-01-01T00:00:00Z"), "fork", json!(true)),
            with_field(repo("e", "2024-01-01T00:00:00Z"), "stargazers_count", json!(7)),
        ]),
        1,
    )
    .await;
    let host = share(Page::default());

    let outcome = load_stats(&test_client(&server), &host, USERNAME).await;

    match outcome {
        StatsOutcome::Updated(stats) => assert_eq!(
            stats,
            PortfolioStats {
                public_repos: Some(12),
                followers: Some(34),
                total_stars: 13,
            }
        ),
        other => panic!("Expected updated stats, got: {:?}", other),
    }
    assert_eq!(
        fields(&host).await,
        vec![Some("12".to_string()), Some("34".to_string()), Some("13".to_string())]
    );
}

#[tokio::test]
async fn test_star_total_saturates_instead_of_overflowing() {
    let server = MockServer::start().await;
    mock_user(&server, 200, json!({ "login": USERNAME, "public_repos": 2, "followers": 0 })).await;
    mock_repos(
        &server,
        200,
        json!([
            with_field(repo("huge", "2024-01-01T00:00:00Z"), "stargazers_count", json!(u64::MAX)),
            with_field(repo("one", "2024-01-01T00:00:00Z"), "stargazers_count", json!(1)),
        ]),
        1,
    )
    .await;
    let host = share(Page::default());

    let outcome = load_stats(&test_client(&server), &host, USERNAME).await;

    match outcome {
        StatsOutcome::Updated(stats) => assert_eq!(stats.total_stars, u64::MAX),
        other => panic!("Expected updated stats, got: {:?}", other),
    }
    assert_eq!(fields(&host).await[2], Some(u64::MAX.to_string()));
}

#[tokio::test]
async fn test_missing_account_counts_use_placeholder() {
    let server = MockServer::start().await;
    mock_user(&server, 200, json!({ "login": USERNAME })).await;
    mock_repos(&server, 200, json!([]), 1).await;
    let host = share(Page::default());

    let outcome = load_stats(&test_client(&server), &host, USERNAME).await;

    assert!(outcome.is_success());
    assert_eq!(
        fields(&host).await,
        vec![Some("—".to_string()), Some("—".to_string()), Some("0".to_string())]
    );
}

#[tokio::test]
async fn test_account_failure_leaves_placeholders_and_skips_repos() {
    let server = MockServer::start().await;
    mock_user(&server, 500, json!({ "message": "boom" })).await;
    mock_repos(&server, 200, json!([]), 0).await;
    let host = share(Page::default());

    let outcome = load_stats(&test_client(&server), &host, USERNAME).await;

    assert!(matches!(
        outcome,
        StatsOutcome::Failed(PortfolioError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(fields(&host).await, placeholders());
}

#[tokio::test]
async fn test_repos_failure_after_account_success_leaves_placeholders() {
    let server = MockServer::start().await;
    mock_user(&server, 200, json!({ "login": USERNAME, "public_repos": 3, "followers": 4 })).await;
    mock_repos(&server, 403, json!({ "message": "rate limited" }), 1).await;
    let host = share(Page::default());

    let outcome = load_stats(&test_client(&server), &host, USERNAME).await;

    assert!(matches!(outcome, StatsOutcome::Failed(_)));
    assert_eq!(fields(&host).await, placeholders());
}

#[tokio::test]
async fn test_missing_field_skips_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let host = share(Page::parse(
        r#"<body><b id="ghRepos">—</b><b id="ghFollowers">—</b></body>"#,
    ));

    let outcome = load_stats(&test_client(&server), &host, USERNAME).await;

    assert!(matches!(outcome, StatsOutcome::Skipped));
}
