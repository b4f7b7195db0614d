//! Steam Web API client

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::http::{self, DEFAULT_TIMEOUT};
use super::{LibraryApi, OwnedGame};
use crate::config::ENV_STEAM_API_KEY;
use crate::error::{ApiError, Result};

/// Steam Web API base URL
const API_BASE_URL: &str = "https://api.steampowered.com";

const RESOLVE_VANITY_PATH: &str = "/ISteamUser/ResolveVanityURL/v0001/";
const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v0001/";

/// Client-side request ceiling
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Steam Web API client
pub struct SteamClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl SteamClient {
    /// Create a client against the public Steam Web API
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_host(api_key, None)
    }

    /// Create a client against a custom host (used for testing)
    pub fn with_host(api_key: Option<String>, host: Option<String>) -> Result<Self> {
        let quota = Quota::per_second(NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            http: http::http_client(DEFAULT_TIMEOUT)?,
            base_url: http::base_url(host, API_BASE_URL),
            api_key,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingKey(ENV_STEAM_API_KEY))?;

        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("key", api_key), ("format", "json")])
            .query(params)
            .send()
            .await
            .map_err(ApiError::from)?;

        http::read_json(response, "Steam").await
    }
}

#[async_trait]
impl LibraryApi for SteamClient {
    async fn resolve_vanity(&self, vanity: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct VanityResponse {
            response: VanityResult,
        }

        #[derive(Deserialize)]
        struct VanityResult {
            steamid: Option<String>,
            message: Option<String>,
        }

        let body: VanityResponse = self
            .get(RESOLVE_VANITY_PATH, &[("vanityurl", vanity)])
            .await?;

        body.response.steamid.ok_or_else(|| {
            let detail = body
                .response
                .message
                .unwrap_or_else(|| "No match".to_string());
            ApiError::NotFound(format!("Steam profile '{}': {}", vanity, detail)).into()
        })
    }

    async fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>> {
        #[derive(Deserialize)]
        struct OwnedGamesResponse {
            response: OwnedGamesResult,
        }

        #[derive(Deserialize)]
        struct OwnedGamesResult {
            // Absent when the profile is private
            #[serde(default)]
            games: Vec<RawGame>,
        }

        #[derive(Deserialize)]
        struct RawGame {
            appid: u64,
            #[serde(default)]
            name: String,
        }

        let body: OwnedGamesResponse = self
            .get(
                OWNED_GAMES_PATH,
                &[("steamid", steam_id), ("include_appinfo", "true")],
            )
            .await?;

        log::debug!(
            "Steam returned {} owned games for {}",
            body.response.games.len(),
            steam_id
        );

        Ok(body
            .response
            .games
            .into_iter()
            .map(|g| OwnedGame::new(g.appid.to_string(), g.name))
            .collect())
    }
}
