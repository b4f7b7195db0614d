//! Google Custom Search client used to give local and Groq models web context

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::SearchApi;
use super::http::{self, DEFAULT_TIMEOUT};
use crate::config::{ENV_GOOGLE_SEARCH_API_KEY, ENV_SEARCH_ENGINE_ID};
use crate::error::{ApiError, Result};

const API_BASE_URL: &str = "https://www.googleapis.com";
const SEARCH_PATH: &str = "/customsearch/v1";

/// Number of result snippets joined into the context
pub const MAX_SNIPPETS: usize = 5;

/// Default per-user quota of the Custom Search JSON API
const RATE_LIMIT_PER_MINUTE: u32 = 100;

/// Google Custom Search JSON API client
pub struct GoogleSearchClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GoogleSearchClient {
    pub fn new(
        api_key: Option<String>,
        engine_id: Option<String>,
        host: Option<String>,
    ) -> Result<Self> {
        let quota = Quota::per_minute(
            NonZeroU32::new(RATE_LIMIT_PER_MINUTE).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            http: http::http_client(DEFAULT_TIMEOUT)?,
            base_url: http::base_url(host, API_BASE_URL),
            api_key,
            engine_id,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    async fn try_search(&self, query: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(default)]
            items: Vec<SearchItem>,
        }

        #[derive(Deserialize)]
        struct SearchItem {
            #[serde(default)]
            snippet: Option<String>,
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingKey(ENV_GOOGLE_SEARCH_API_KEY))?;
        let engine_id = self
            .engine_id
            .as_deref()
            .ok_or(ApiError::MissingKey(ENV_SEARCH_ENGINE_ID))?;

        self.rate_limiter.until_ready().await;

        let num = MAX_SNIPPETS.to_string();
        let response = self
            .http
            .get(format!("{}{}", self.base_url, SEARCH_PATH))
            .query(&[
                ("key", api_key),
                ("cx", engine_id),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(ApiError::from)?;

        let body: SearchResponse = http::read_json(response, "Google Search").await?;

        let snippets: Vec<String> = body
            .items
            .into_iter()
            .filter_map(|item| item.snippet)
            .take(MAX_SNIPPETS)
            .collect();

        Ok(snippets.join(" "))
    }
}

#[async_trait]
impl SearchApi for GoogleSearchClient {
    async fn search(&self, query: &str) -> String {
        match self.try_search(query).await {
            Ok(context) => {
                log::debug!("Search '{}' returned {} bytes of context", query, context.len());
                context
            }
            Err(e) => {
                log::warn!("Error performing web search for '{}': {}", query, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> GoogleSearchClient {
        GoogleSearchClient::new(
            Some("search-key".to_string()),
            Some("engine-1".to_string()),
            Some(server.url()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_joins_snippets() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Team Fortress 2 PC DRM Steam".into()),
                Matcher::UrlEncoded("cx".into(), "engine-1".into()),
                Matcher::UrlEncoded("num".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"items": [
                    {"title": "a", "snippet": "TF2 uses Steam DRM."},
                    {"title": "no snippet"},
                    {"title": "b", "snippet": "Free to play."}
                ]}"#,
            )
            .create_async()
            .await;

        let context = client_for(&server)
            .search("Team Fortress 2 PC DRM Steam")
            .await;
        assert_eq!(context, "TF2 uses Steam DRM. Free to play.");
    }

    #[tokio::test]
    async fn test_search_caps_snippets() {
        let mut server = mockito::Server::new_async().await;
        let items: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"snippet": "s{}"}}"#, i))
            .collect();
        let _m = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(format!(r#"{{"items": [{}]}}"#, items.join(",")))
            .create_async()
            .await;

        let context = client_for(&server).search("q").await;
        assert_eq!(context, "s0 s1 s2 s3 s4");
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind": "customsearch#search"}"#)
            .create_async()
            .await;

        assert_eq!(client_for(&server).search("q").await, "");
    }

    #[tokio::test]
    async fn test_search_failure_is_absorbed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"message": "quota"}}"#)
            .create_async()
            .await;

        assert_eq!(client_for(&server).search("q").await, "");
    }

    #[tokio::test]
    async fn test_search_missing_credentials_is_empty() {
        let client = GoogleSearchClient::new(None, None, None).unwrap();
        assert_eq!(client.search("q").await, "");
    }
}
