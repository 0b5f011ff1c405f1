use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Outbound notification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    /// `None` selects the log-only notifier.
    pub webhook_url: Option<String>,
    pub timeout: Duration,
}

impl NotifyConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let webhook_url = env::var("NOTIFY_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if let Some(url) = &webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::config(
                    "NOTIFY_WEBHOOK_URL must be an http(s) URL",
                ));
            }
        }

        let timeout_ms = match env::var("NOTIFY_TIMEOUT_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::config(format!("NOTIFY_TIMEOUT_MS must be an integer, got '{raw}'"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            webhook_url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}
