#![allow(dead_code)]

use github_portfolio::github::GitHubClient;
use github_portfolio::PortfolioConfig;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

pub const USERNAME: &str = "octo";

pub fn test_config(server: &MockServer, max_repos: usize) -> PortfolioConfig {
    PortfolioConfig::new(USERNAME, max_repos)
        .expect("valid username")
        .with_api_base_url(&server.uri())
        .expect("valid mock server url")
        .with_request_timeout(Some(Duration::from_secs(5)))
        .with_frame_interval(Duration::from_millis(1))
}

pub fn test_client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(&test_config(server, 6)).expect("Failed to create client")
}

/// Repository JSON as returned by `GET /users/{user}/repos`.
pub fn repo(name: &str, pushed_at: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} description", name),
        "language": "Rust",
        "homepage": null,
        "html_url": format!("https://github.com/{}/{}", USERNAME, name),
        "pushed_at": pushed_at,
        "fork": false,
        "archived": false,
        "stargazers_count": 1
    })
}

pub fn with_field(mut repo: Value, key: &str, value: Value) -> Value {
    repo[key] = value;
    repo
}

pub fn fork(name: &str, pushed_at: &str) -> Value {
    with_field(repo(name, pushed_at), "fork", json!(true))
}

pub fn archived(name: &str, pushed_at: &str) -> Value {
    with_field(repo(name, pushed_at), "archived", json!(true))
}
