//! Listening tips shown under the suggestions list.
//!
//! The tips come from a public demo endpoint returning
//! `[{ "id": 1, "title": "...", "body": "...", ... }]`. Only even ids are
//! kept and the first three are shown. Any failure turns into a fallback
//! line; the rest of the route never waits on this request.

use anyhow::{Context, Result};
use log::{debug, error};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Endpoint used when none is configured.
pub const DEFAULT_TIPS_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Shown in place of the tips when they cannot be loaded.
pub const TIPS_FALLBACK: &str = "Could not load tips right now.";

pub const MAX_TIPS: usize = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One item as the endpoint returns it. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTip {
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub title: String,
    pub body: String,
}

/// What the tips area displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipsSection {
    Loaded(Vec<Tip>),
    Unavailable,
}

impl fmt::Display for TipsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipsSection::Loaded(tips) if tips.is_empty() => write!(f, "No tips today."),
            TipsSection::Loaded(tips) => {
                for (i, tip) in tips.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "* {}\n  {}", tip.title, tip.body.replace('\n', " "))?;
                }
                Ok(())
            }
            TipsSection::Unavailable => write!(f, "{TIPS_FALLBACK}"),
        }
    }
}

/// Keep even ids, first [`MAX_TIPS`] of them, in response order.
#[must_use]
pub fn select_tips(items: Vec<RemoteTip>) -> Vec<Tip> {
    items
        .into_iter()
        .filter(|item| item.id % 2 == 0)
        .take(MAX_TIPS)
        .map(|item| Tip {
            title: item.title,
            body: item.body,
        })
        .collect()
}

/// Request the tips.
///
/// # Errors
///
/// Returns an error on connection failure, a non-2xx status, or a body that
/// is not a JSON array of tips.
pub async fn fetch_tips(client: &reqwest::Client, url: &str) -> Result<Vec<Tip>> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .context("Failed to reach tips endpoint")?;

    if !response.status().is_success() {
        anyhow::bail!("Tips endpoint returned status: {}", response.status());
    }

    let items: Vec<RemoteTip> = response
        .json()
        .await
        .context("Failed to parse tips response")?;

    debug!("Tips endpoint returned {} items", items.len());
    Ok(select_tips(items))
}

/// Fetch and fold every failure into [`TipsSection::Unavailable`].
pub async fn load_tips(client: &reqwest::Client, url: &str) -> TipsSection {
    match fetch_tips(client, url).await {
        Ok(tips) => TipsSection::Loaded(tips),
        Err(e) => {
            error!("Could not load tips from {url}: {e:#}");
            TipsSection::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn remote(id: u64) -> RemoteTip {
        RemoteTip {
            id,
            title: format!("title {id}"),
            body: format!("body {id}"),
        }
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    async fn tips_server(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_select_keeps_first_three_even_ids() {
        let items = (1..=10).map(remote).collect();
        let titles: Vec<String> = select_tips(items).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["title 2", "title 4", "title 6"]);
    }

    #[test]
    fn test_select_with_no_even_ids() {
        let items = vec![remote(1), remote(3)];
        assert!(select_tips(items).is_empty());
    }

    #[test]
    fn test_unavailable_renders_fallback() {
        assert_eq!(TipsSection::Unavailable.to_string(), TIPS_FALLBACK);
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let server = tips_server(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "a", "body": "x", "userId": 1},
            {"id": 2, "title": "b", "body": "y", "userId": 1}
        ])))
        .await;

        let section = load_tips(&client(), &format!("{}/posts", server.uri())).await;
        assert_eq!(
            section,
            TipsSection::Loaded(vec![Tip {
                title: "b".to_string(),
                body: "y".to_string()
            }])
        );
    }

    #[tokio::test]
    async fn test_network_error_falls_back() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let section = load_tips(&client(), &format!("http://{addr}/posts")).await;
        assert_eq!(section, TipsSection::Unavailable);
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let server = tips_server(ResponseTemplate::new(500).set_body_json(json!([]))).await;
        let section = load_tips(&client(), &format!("{}/posts", server.uri())).await;
        assert_eq!(section, TipsSection::Unavailable);
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let server = tips_server(ResponseTemplate::new(200).set_body_json(json!({"not": "a list"}))).await;
        let section = load_tips(&client(), &format!("{}/posts", server.uri())).await;
        assert_eq!(section, TipsSection::Unavailable);
    }
}
