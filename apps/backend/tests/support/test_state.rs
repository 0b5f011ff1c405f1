use std::sync::Arc;

use hitlist::config::db::DbConfig;
use hitlist::infra::state::build_state;
use hitlist::notify::{DispatchMode, MemoryNotifier};
use hitlist::state::app_state::AppState;
use hitlist::AppError;

/// A migrated in-memory database plus the notifier it reports to.
///
/// Every call gets its own database, so tests never share rows. Notices are
/// delivered inline, so deliveries are visible as soon as a command returns.
pub struct TestEnv {
    pub state: AppState,
    pub notifier: Arc<MemoryNotifier>,
}

pub async fn build_test_state() -> Result<TestEnv, AppError> {
    let notifier = Arc::new(MemoryNotifier::new());
    let state = build_state()
        .with_db(DbConfig::sqlite_memory())
        .with_notifier(notifier.clone())
        .with_dispatch(DispatchMode::Inline)
        .build()
        .await?;
    Ok(TestEnv { state, notifier })
}
