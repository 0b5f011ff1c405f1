// Version-checked game updates.

use hitlist::adapters::games_sea;
use hitlist::db::with_txn;
use hitlist::errors::domain::{ConflictKind, DomainError};
use hitlist::errors::ErrorCode;
use hitlist::AppError;

use crate::support::build_test_state;
use crate::support::factory::seed_waiting_game;

#[tokio::test]
async fn bump_version_with_current_version_advances_it() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_waiting_game(&env.state, &["A"], &[]).await?;
    let game_id = seeded.game_id.clone();

    with_txn(&env.state, move |txn| {
        Box::pin(async move {
            let before = games_sea::require_game(txn, &game_id).await?;
            let after = games_sea::bump_version(txn, &game_id, before.version).await?;
            assert_eq!(after.version, before.version + 1);
            assert_eq!(after.status, before.status);
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn stale_version_is_an_optimistic_lock_conflict() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_waiting_game(&env.state, &["A"], &[]).await?;
    let game_id = seeded.game_id.clone();

    let (domain_err, current) = with_txn(&env.state, move |txn| {
        Box::pin(async move {
            let stale = games_sea::require_game(txn, &game_id).await?.version;
            // Another writer gets there first.
            let current = games_sea::bump_version(txn, &game_id, stale).await?.version;

            let err = games_sea::bump_version(txn, &game_id, stale)
                .await
                .expect_err("stale version must not update");
            Ok::<_, AppError>((DomainError::from(err), current))
        })
    })
    .await?;

    match &domain_err {
        DomainError::Conflict(ConflictKind::OptimisticLock, _) => {}
        other => panic!("expected OptimisticLock, got: {other:?}"),
    }
    assert_eq!(AppError::from(domain_err).code(), ErrorCode::OptimisticLock);

    // The losing attempt changed nothing.
    let game = games_sea::require_game(&env.state.db, &seeded.game_id).await?;
    assert_eq!(game.version, current);
    Ok(())
}
