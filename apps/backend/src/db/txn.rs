use futures_util::future::BoxFuture;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::warn;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Execute a function within a database transaction.
///
/// Begins a transaction, runs the closure, commits on `Ok` and rolls back on
/// `Err`. Every mutation of a command happens inside one call, so a failed
/// precondition or a lost optimistic-lock race leaves no partial state.
///
/// The closure must own what it captures:
///
/// ```ignore
/// with_txn(&state, move |txn| Box::pin(async move { lifecycle::start(txn, &game_id, &mut rng).await }))
/// ```
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    R: Send,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<R, AppError>> + Send,
{
    let txn = state.db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
