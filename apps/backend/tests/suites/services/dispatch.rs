use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hitlist::config::db::DbConfig;
use hitlist::error::AppError;
use hitlist::infra::state::build_state;
use hitlist::notify::{DeliveryOutcome, DispatchMode, NoticeKind, Notifier, Recipient};
use hitlist::services::GameCommands;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::support::factory::{force_ring, seed_started_game};

/// Holds every delivery until the test opens the gate.
struct GatedNotifier {
    gate: Semaphore,
    events: Mutex<Vec<&'static str>>,
}

impl GatedNotifier {
    fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
            events: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for GatedNotifier {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn notify(&self, _recipient: &Recipient, kind: &NoticeKind) -> DeliveryOutcome {
        match self.gate.acquire().await {
            Ok(permit) => permit.forget(),
            Err(_) => return DeliveryOutcome::Failed("gate closed".into()),
        }
        self.events.lock().push(kind.event());
        DeliveryOutcome::Delivered
    }
}

#[tokio::test]
async fn background_dispatch_does_not_hold_the_command() -> Result<(), AppError> {
    let gated = Arc::new(GatedNotifier::closed());
    let state = build_state()
        .with_db(DbConfig::sqlite_memory())
        .with_notifier(gated.clone())
        .with_dispatch(DispatchMode::Background)
        .build()
        .await?;

    let names = ["A", "B", "C"];
    let seeded = seed_started_game(&state, &names, &[]).await?;
    force_ring(&state, &seeded, &names).await?;
    let (a, b) = (seeded.player("A"), seeded.player("B"));

    // Every delivery is blocked, yet the command completes.
    let submission = tokio::time::timeout(
        Duration::from_secs(2),
        GameCommands::new(&state).submit_claim(&a.token, b.id),
    )
    .await
    .expect("claim should not wait for delivery")?;
    assert!(submission.created);
    assert!(gated.events.lock().is_empty());

    gated.gate.add_permits(16);
    let delivered = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if gated.events.lock().contains(&"kill_claimed") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(delivered.is_ok(), "kill_claimed was never delivered");
    Ok(())
}
