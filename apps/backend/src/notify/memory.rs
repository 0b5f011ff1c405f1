use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{DeliveryOutcome, NoticeKind, Notifier, Recipient};

/// A notice as a `MemoryNotifier` saw it, including failed attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: Recipient,
    pub kind: NoticeKind,
    pub outcome: DeliveryOutcome,
}

/// In-process notifier that records every attempt. Contacts registered
/// with `fail_for` (or everything, after `fail_all`) report `Failed`.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    deliveries: Mutex<Vec<Delivery>>,
    failing: Mutex<HashSet<String>>,
    fail_all: Mutex<bool>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, contact: impl Into<String>) {
        self.failing.lock().insert(contact.into());
    }

    pub fn fail_all(&self) {
        *self.fail_all.lock() = true;
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    /// Notices addressed to one player, in delivery order.
    pub fn for_player(&self, player_id: i64) -> Vec<NoticeKind> {
        self.deliveries
            .lock()
            .iter()
            .filter(|d| d.recipient.player_id == player_id)
            .map(|d| d.kind.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.deliveries.lock().clear();
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn notify(&self, recipient: &Recipient, kind: &NoticeKind) -> DeliveryOutcome {
        let failing =
            *self.fail_all.lock() || self.failing.lock().contains(&recipient.contact);
        let outcome = if failing {
            DeliveryOutcome::Failed("configured to fail".to_string())
        } else {
            DeliveryOutcome::Delivered
        };

        self.deliveries.lock().push(Delivery {
            recipient: recipient.clone(),
            kind: kind.clone(),
            outcome: outcome.clone(),
        });
        outcome
    }
}
