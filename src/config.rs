use crate::error::{AppError, AppResult};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub web_base_url: String,
    pub store_path: String,
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let poll_interval_secs = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("POLL_INTERVAL_SECS: {}", e)))?;

        if poll_interval_secs == 0 {
            return Err(AppError::Config(
                "POLL_INTERVAL_SECS must be positive".to_string(),
            ));
        }

        Ok(Self {
            api_base_url: std::env::var("HODL_API_BASE_URL")
                .unwrap_or_else(|_| "https://hodlhodl.com/api/v1".to_string()),
            web_base_url: std::env::var("HODL_WEB_BASE_URL")
                .unwrap_or_else(|_| "https://hodlhodl.com".to_string()),
            store_path: std::env::var("STORE_PATH")
                .unwrap_or_else(|_| "store.json".to_string()),
            poll_interval: Duration::from_secs(poll_interval_secs),
        })
    }
}
