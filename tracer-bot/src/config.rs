//! Process config: credentials, operator id, endpoints, logging. Loaded from env.

use std::env;
use std::time::Duration;

use tracer_core::{Result, TracerError};
use tracker::DEFAULT_TRACK_INTERVAL;
use vk_client::{mask_token, VK_API_BASE};

pub const DEFAULT_LOG_FILE: &str = "logs/vk-tracer.log";

#[derive(Clone)]
pub struct AppConfig {
    /// TG_TOKEN
    pub tg_token: String,
    /// VK_TOKEN
    pub vk_token: String,
    /// OWNER_ID: the only Telegram user the bot answers, and where notifications go.
    pub owner_id: i64,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// VK_API_URL
    pub vk_api_url: String,
    /// LOG_FILE
    pub log_file: String,
    /// TRACK_INTERVAL_SECS
    pub track_interval: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("tg_token", &mask_token(&self.tg_token))
            .field("vk_token", &mask_token(&self.vk_token))
            .field("owner_id", &self.owner_id)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("vk_api_url", &self.vk_api_url)
            .field("log_file", &self.log_file)
            .field("track_interval", &self.track_interval)
            .finish()
    }
}

/// Override if given, else the env var; empty counts as missing.
fn required(name: &str, value: Option<String>) -> Result<String> {
    value
        .or_else(|| env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| TracerError::Config(format!("{} not specified", name)))
}

impl AppConfig {
    /// Load from environment variables. `tg_token` / `vk_token` override TG_TOKEN / VK_TOKEN.
    pub fn load(tg_token: Option<String>, vk_token: Option<String>) -> Result<Self> {
        let tg_token = required("TG_TOKEN", tg_token)?;
        let vk_token = required("VK_TOKEN", vk_token)?;
        let owner_id = required("OWNER_ID", None)?
            .trim()
            .parse::<i64>()
            .map_err(|_| TracerError::Config("OWNER_ID must be a number".to_string()))?;

        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok()
            .filter(|v| !v.is_empty());
        let vk_api_url = env::var("VK_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| VK_API_BASE.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let track_interval = env::var("TRACK_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TRACK_INTERVAL);

        Ok(Self {
            tg_token,
            vk_token,
            owner_id,
            telegram_api_url,
            vk_api_url,
            log_file,
            track_interval,
        })
    }

    /// Validate config (API base URLs must parse).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                return Err(TracerError::Config(format!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                )));
            }
        }
        if reqwest::Url::parse(&self.vk_api_url).is_err() {
            return Err(TracerError::Config(format!(
                "VK_API_URL is not a valid URL: {}",
                self.vk_api_url
            )));
        }
        Ok(())
    }
}
