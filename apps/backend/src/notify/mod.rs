//! Notification gateway.
//!
//! Services never talk to a `Notifier`; they return an ordered list of
//! `Notice`s with their result. The command layer commits first and then
//! calls `dispatch`, so delivery can never roll back game state.
//!
//! By default the command layer spawns the dispatch and returns without
//! waiting for it (`DispatchMode::Background`).

mod log;
mod memory;
mod webhook;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::logging::pii::Redacted;

pub use log::LogNotifier;
pub use memory::{Delivery, MemoryNotifier};
pub use webhook::WebhookNotifier;

/// Who a notice is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub player_id: i64,
    pub name: String,
    pub contact: String,
}

/// Event payloads, tagged as `{"event": "...", ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NoticeKind {
    GameStarted {
        game_name: String,
        target_name: String,
        task: Option<String>,
    },
    KillClaimed {
        killer_name: String,
        request_id: i64,
    },
    Eliminated {
        killer_name: String,
    },
    NewTarget {
        target_name: String,
        task: Option<String>,
    },
    Victory {
        kills: i32,
    },
    GameOver {
        winner_name: String,
    },
    ClaimRejected {
        victim_name: String,
        request_id: i64,
    },
}

impl NoticeKind {
    pub fn event(&self) -> &'static str {
        match self {
            NoticeKind::GameStarted { .. } => "game_started",
            NoticeKind::KillClaimed { .. } => "kill_claimed",
            NoticeKind::Eliminated { .. } => "eliminated",
            NoticeKind::NewTarget { .. } => "new_target",
            NoticeKind::Victory { .. } => "victory",
            NoticeKind::GameOver { .. } => "game_over",
            NoticeKind::ClaimRejected { .. } => "claim_rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub recipient: Recipient,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(recipient: Recipient, kind: NoticeKind) -> Self {
        Self { recipient, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Skipped,
    Failed(String),
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered => write!(f, "delivered"),
            DeliveryOutcome::Skipped => write!(f, "skipped"),
            DeliveryOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// How the command layer hands committed notices to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Spawned onto the runtime; the command returns without waiting.
    #[default]
    Background,
    /// Awaited before the command returns. Tests use this to assert on
    /// deliveries without polling.
    Inline,
}

/// Delivery backend. Implementations report failures as values and never
/// panic; the core only logs the outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    async fn notify(&self, recipient: &Recipient, kind: &NoticeKind) -> DeliveryOutcome;
}

/// Deliver notices in order, logging each outcome. Failures are swallowed.
pub async fn dispatch(notifier: &dyn Notifier, notices: Vec<Notice>) -> Vec<DeliveryOutcome> {
    let mut outcomes = Vec::with_capacity(notices.len());
    for notice in notices {
        let outcome = notifier.notify(&notice.recipient, &notice.kind).await;
        match &outcome {
            DeliveryOutcome::Failed(reason) => warn!(
                notifier = notifier.name(),
                event = notice.kind.event(),
                player_id = notice.recipient.player_id,
                contact = %Redacted(&notice.recipient.contact),
                reason = %Redacted(reason),
                "notice delivery failed"
            ),
            other => info!(
                notifier = notifier.name(),
                event = notice.kind.event(),
                player_id = notice.recipient.player_id,
                outcome = %other,
                "notice dispatched"
            ),
        }
        outcomes.push(outcome);
    }
    outcomes
}
