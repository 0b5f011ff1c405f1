// Kill request adapter: status compare-and-set and the partial unique index
// on pending (killer, victim) pairs.

use hitlist::adapters::kill_requests_sea;
use hitlist::db::with_txn;
use hitlist::entities::kill_requests::KillRequestStatus;
use hitlist::errors::domain::{ConflictKind, DomainError};
use hitlist::AppError;

use crate::support::build_test_state;
use crate::support::factory::seed_waiting_game;

#[tokio::test]
async fn transition_from_pending_succeeds_once() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_waiting_game(&env.state, &["A", "B"], &[]).await?;
    let (game_id, a, b) = (
        seeded.game_id.clone(),
        seeded.player("A").id,
        seeded.player("B").id,
    );

    with_txn(&env.state, move |txn| {
        Box::pin(async move {
            let request = kill_requests_sea::create_pending(txn, &game_id, a, b).await?;
            assert_eq!(request.status, KillRequestStatus::Pending);
            assert!(request.resolved_at.is_none());

            let first = kill_requests_sea::transition_from_pending(
                txn,
                request.id,
                KillRequestStatus::Confirmed,
            )
            .await?;
            assert_eq!(first, 1);

            // Loser of the race: status already moved on.
            let second = kill_requests_sea::transition_from_pending(
                txn,
                request.id,
                KillRequestStatus::Rejected,
            )
            .await?;
            assert_eq!(second, 0);

            let stored = kill_requests_sea::find_by_id(txn, request.id)
                .await?
                .expect("request row");
            assert_eq!(stored.status, KillRequestStatus::Confirmed);
            assert!(stored.resolved_at.is_some());

            let unknown = kill_requests_sea::transition_from_pending(
                txn,
                request.id + 1000,
                KillRequestStatus::Confirmed,
            )
            .await?;
            assert_eq!(unknown, 0);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn duplicate_pending_pair_is_a_conflict() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_waiting_game(&env.state, &["A", "B"], &[]).await?;
    let (game_id, a, b) = (
        seeded.game_id.clone(),
        seeded.player("A").id,
        seeded.player("B").id,
    );

    with_txn(&env.state, move |txn| {
        Box::pin(async move {
            kill_requests_sea::create_pending(txn, &game_id, a, b).await?;
            Ok::<_, AppError>(())
        })
    })
    .await?;

    let game_id = seeded.game_id.clone();
    let result = with_txn(&env.state, move |txn| {
        Box::pin(async move {
            let err = kill_requests_sea::create_pending(txn, &game_id, a, b)
                .await
                .expect_err("second pending claim for the pair must fail");
            Ok::<_, AppError>(DomainError::from(err))
        })
    })
    .await?;

    match result {
        DomainError::Conflict(ConflictKind::PendingClaimExists, _) => {}
        other => panic!("expected PendingClaimExists, got: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn resolved_pair_can_be_claimed_again() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_waiting_game(&env.state, &["A", "B"], &[]).await?;
    let (game_id, a, b) = (
        seeded.game_id.clone(),
        seeded.player("A").id,
        seeded.player("B").id,
    );

    with_txn(&env.state, move |txn| {
        Box::pin(async move {
            let first = kill_requests_sea::create_pending(txn, &game_id, a, b).await?;
            kill_requests_sea::transition_from_pending(
                txn,
                first.id,
                KillRequestStatus::Rejected,
            )
            .await?;

            // The unique index only covers PENDING rows.
            let second = kill_requests_sea::create_pending(txn, &game_id, a, b).await?;
            assert_ne!(second.id, first.id);

            let pending = kill_requests_sea::find_pending_pair(txn, a, b)
                .await?
                .expect("pending row");
            assert_eq!(pending.id, second.id);
            Ok::<_, AppError>(())
        })
    })
    .await
}
