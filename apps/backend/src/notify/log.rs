use async_trait::async_trait;
use tracing::info;

use super::{DeliveryOutcome, NoticeKind, Notifier, Recipient};
use crate::logging::pii::Redacted;

/// Default backend when no transport is configured: records the notice in
/// the log and reports it as skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, recipient: &Recipient, kind: &NoticeKind) -> DeliveryOutcome {
        let payload = serde_json::to_string(kind).unwrap_or_else(|_| kind.event().to_string());
        info!(
            player_id = recipient.player_id,
            contact = %Redacted(&recipient.contact),
            payload = %payload,
            "notice (no transport configured)"
        );
        DeliveryOutcome::Skipped
    }
}
