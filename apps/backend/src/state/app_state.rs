use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::notify::{DispatchMode, Notifier};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Connection pool; the store is the only synchronisation point
    pub db: DatabaseConnection,
    /// Delivery backend for player notices
    pub notifier: Arc<dyn Notifier>,
    /// Whether commands wait for notice delivery
    pub dispatch: DispatchMode,
}

impl AppState {
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            notifier,
            dispatch: DispatchMode::default(),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("notifier", &self.notifier.name())
            .field("dispatch", &self.dispatch)
            .finish()
    }
}
