mod common;

use common::{repo, test_client, test_config, USERNAME};
use github_portfolio::error::PortfolioError;
use github_portfolio::github::GitHubClient;
use github_portfolio::types::RepoSort;
use github_portfolio::PortfolioConfig;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_github_client_creation() {
    let config = PortfolioConfig::new("octo", 6).unwrap();
    assert_ok!(GitHubClient::new(&config));
}

#[tokio::test]
async fn test_list_repositories_sends_page_size_and_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/users/{}/repos", USERNAME)))
        .and(query_param("per_page", "100"))
        .and(query_param("sort", "pushed"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo("alpha", "2024-01-01T00:00:00Z"),
            repo("beta", "2024-02-01T00:00:00Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let repos = client
        .list_user_repositories(USERNAME, Some(RepoSort::Pushed))
        .await
        .expect("Failed to list repositories");

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "alpha");
    assert_eq!(repos[1].html_url, "https://github.com/octo/beta");
}

#[tokio::test]
async fn test_get_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/users/{}", USERNAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": USERNAME,
            "public_repos": 12,
            "followers": 34
        })))
        .mount(&server)
        .await;

    let account = test_client(&server).get_user(USERNAME).await.unwrap();
    assert_eq!(account.public_repos, Some(12));
    assert_eq!(account.followers, Some(34));
}

#[tokio::test]
async fn test_repository_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let result = test_client(&server).list_user_repositories("ghost", None).await;

    match result.unwrap_err() {
        PortfolioError::HttpStatus { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/users/ghost/repos?per_page=100"), "url was {}", url);
        }
        other => panic!("Expected HttpStatus error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).get_user(USERNAME).await;
    assert!(matches!(result, Err(PortfolioError::JsonError(_))));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let server = MockServer::start().await;
    let config = test_config(&server, 6)
        .with_api_base_url("http://127.0.0.1:9")
        .unwrap();
    drop(server);

    let client = GitHubClient::new(&config).unwrap();
    let result = client.get_user(USERNAME).await;
    let error = assert_err!(result);
    assert!(matches!(error, PortfolioError::NetworkError(_)));
}

#[tokio::test]
#[ignore = "Hits the live GitHub API"]
async fn test_live_repositories() {
    let config = PortfolioConfig::new("octocat", 6).unwrap();
    let client = GitHubClient::new(&config).expect("Failed to create client");

    let repos = client
        .list_user_repositories("octocat", Some(RepoSort::Pushed))
        .await
        .expect("Failed to list repositories");

    assert!(!repos.is_empty());
    for repo in &repos {
        assert!(!repo.name.is_empty());
        assert!(!repo.html_url.is_empty());
    }
}
