//! # VK presence client
//!
//! Implements [`PresenceGateway`] with VK's `users.get` method: one GET per batch, asking for
//! `last_seen`, `online` and `domain` of every requested id or alias.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tracer_core::PresenceGateway;
//! use vk_client::VkClient;
//!
//! async fn example() -> tracer_core::Result<()> {
//!     let client = VkClient::new("vk-access-token".to_string());
//!     let users = client.batch_query(&["durov".to_string(), "2".to_string()]).await?;
//!     for user in users {
//!         println!("{} online={}", user.domain, user.online);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! A body without `response` (VK reports failures as an `error` object with HTTP 200) is a
//! [`TracerError::Protocol`]; a request that never got an answer is a
//! [`TracerError::Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracer_core::{Presence, PresenceGateway, Result, TracerError};
use tracing::{debug, info, warn};

pub const VK_API_BASE: &str = "https://api.vk.com/method";
pub const VK_API_VERSION: &str = "5.126";
const USER_FIELDS: &str = "last_seen,online,domain";
/// Language VK renders names in.
const NAME_LANG: &str = "ru";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Masks an access token for safe logging: first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the token.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// VK API client for presence lookups.
#[derive(Debug, Clone)]
pub struct VkClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl VkClient {
    /// Creates a client against the public VK API.
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, VK_API_BASE.to_string())
    }

    /// Creates a client against a custom method endpoint (proxies, tests).
    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(error) => {
                warn!(%error, "failed to build VK http client with timeout, using default client");
                Client::new()
            }
        };
        Self {
            client,
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UsersGetResponse {
    response: Option<Vec<VkUser>>,
    error: Option<VkApiError>,
}

#[derive(Debug, Deserialize)]
struct VkApiError {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct VkUser {
    id: i64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    online: u8,
    #[serde(default)]
    last_seen: Option<LastSeen>,
}

#[derive(Debug, Deserialize)]
struct LastSeen {
    #[serde(default)]
    time: i64,
}

impl From<VkUser> for Presence {
    fn from(user: VkUser) -> Self {
        Presence {
            id: user.id,
            domain: user.domain,
            first_name: user.first_name,
            last_name: user.last_name,
            online: user.online == 1,
            last_seen: user.last_seen.map(|l| l.time).unwrap_or(0),
        }
    }
}

/// Decodes a `users.get` body into presence records.
fn parse_users_get(body: &[u8]) -> Result<Vec<Presence>> {
    let parsed: UsersGetResponse = serde_json::from_slice(body)
        .map_err(|e| TracerError::Protocol(format!("users.get method error: {}", e)))?;

    match parsed.response {
        Some(users) => Ok(users.into_iter().map(Presence::from).collect()),
        None => match parsed.error {
            Some(err) => Err(TracerError::Protocol(format!(
                "users.get method error ({}): {}",
                err.error_code, err.error_msg
            ))),
            None => Err(TracerError::Protocol("users.get method error".to_string())),
        },
    }
}

#[async_trait]
impl PresenceGateway for VkClient {
    async fn batch_query(&self, keys: &[String]) -> Result<Vec<Presence>> {
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let user_ids = keys.join(",");
        debug!(
            user_ids = %user_ids,
            access_token = %mask_token(&self.access_token),
            "step: VK users.get request"
        );

        let url = format!("{}/users.get", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("v", VK_API_VERSION),
                ("lang", NAME_LANG),
                ("user_ids", user_ids.as_str()),
                ("fields", USER_FIELDS),
            ])
            .send()
            .await
            .map_err(|e| TracerError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TracerError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(TracerError::Protocol(format!(
                "users.get HTTP {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }

        let users = parse_users_get(&body)?;
        info!(
            requested = keys.len(),
            returned = users.len(),
            "step: VK users.get done"
        );
        Ok(users)
    }
}
