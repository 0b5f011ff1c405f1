use std::sync::Arc;

use crate::config::db::DbConfig;
use crate::config::notify::NotifyConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::notify::{DispatchMode, LogNotifier, Notifier, WebhookNotifier};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_config: DbConfig,
    notifier: Option<Arc<dyn Notifier>>,
    notify_config: Option<NotifyConfig>,
    dispatch: DispatchMode,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_config: DbConfig::sqlite_memory(),
            notifier: None,
            notify_config: None,
            dispatch: DispatchMode::default(),
        }
    }

    pub fn with_db(mut self, config: DbConfig) -> Self {
        self.db_config = config;
        self
    }

    /// Use an explicit notifier (tests inject a `MemoryNotifier`).
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Derive the notifier from configuration.
    pub fn with_notify_config(mut self, config: NotifyConfig) -> Self {
        self.notify_config = Some(config);
        self
    }

    /// Await notice delivery inside each command instead of spawning it.
    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let notifier: Arc<dyn Notifier> = match (self.notifier, self.notify_config) {
            (Some(n), _) => n,
            (None, Some(NotifyConfig {
                webhook_url: Some(url),
                timeout,
            })) => Arc::new(WebhookNotifier::new(url, timeout)?),
            (None, _) => Arc::new(LogNotifier),
        };

        // single entrypoint: connect + migrate
        let conn = bootstrap_db(&self.db_config).await?;
        Ok(AppState::new(conn, notifier).with_dispatch(self.dispatch))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
