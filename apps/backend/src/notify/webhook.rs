use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{DeliveryOutcome, NoticeKind, Notifier, Recipient};
use crate::error::AppError;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Serialize)]
struct WebhookBody<'a> {
    to: &'a str,
    player_id: i64,
    name: &'a str,
    notice: &'a NoticeKind,
}

/// POSTs each notice as JSON to a single endpoint (an SMS/e-mail relay).
///
/// Timeouts, connection errors and 5xx responses are retried up to
/// `MAX_ATTEMPTS` times; 4xx responses are final.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build webhook client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    async fn attempt(&self, body: &WebhookBody<'_>) -> Result<(), (bool, String)> {
        let resp = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| (e.is_timeout() || e.is_connect(), e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err((status.is_server_error(), format!("relay returned {status}")))
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, recipient: &Recipient, kind: &NoticeKind) -> DeliveryOutcome {
        let body = WebhookBody {
            to: &recipient.contact,
            player_id: recipient.player_id,
            name: &recipient.name,
            notice: kind,
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&body).await {
                Ok(()) => return DeliveryOutcome::Delivered,
                Err((retryable, reason)) if retryable && attempt < MAX_ATTEMPTS => {
                    debug!(attempt, reason = %reason, "webhook delivery retry");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err((_, reason)) => return DeliveryOutcome::Failed(reason),
            }
        }
    }
}
