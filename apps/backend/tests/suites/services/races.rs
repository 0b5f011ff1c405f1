use hitlist::error::AppError;
use hitlist::errors::ErrorCode;
use hitlist::repos::kill_requests;
use hitlist::services::{GameCommands, Resolution};

use crate::support::build_test_state;
use crate::support::factory::{force_ring, load, seed_started_game};

const FIVE: [&str; 5] = ["A", "B", "C", "D", "E"];

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn victim_and_admin_racing_confirm_eliminate_once() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let (a, b) = (seeded.player("A").clone(), seeded.player("B").clone());

    let claim = GameCommands::new(&env.state)
        .submit_claim(&a.token, b.id)
        .await?;
    let request_id = claim.request.id;

    let by_admin = {
        let state = env.state.clone();
        let admin_token = seeded.admin_token.clone();
        tokio::spawn(async move {
            GameCommands::new(&state)
                .approve(&admin_token, request_id)
                .await
        })
    };
    let by_victim = {
        let state = env.state.clone();
        let token = b.token.clone();
        tokio::spawn(async move {
            GameCommands::new(&state)
                .confirm_as_victim(&token, request_id)
                .await
        })
    };

    let outcomes = [
        by_admin.await.expect("admin task panicked")?,
        by_victim.await.expect("victim task panicked")?,
    ];
    let confirmed = outcomes
        .iter()
        .filter(|r| matches!(r, Resolution::Confirmed { .. }))
        .count();
    let already = outcomes
        .iter()
        .filter(|r| matches!(r, Resolution::AlreadyResolved { .. }))
        .count();
    assert_eq!((confirmed, already), (1, 1), "outcomes: {outcomes:?}");

    let killer = load(&env.state, &a).await;
    assert_eq!(killer.kills, 1);
    assert_eq!(
        kill_requests::count_confirmed_by_killer(&env.state.db, a.id).await?,
        1
    );
    assert!(!load(&env.state, &b).await.is_alive);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_duplicate_claims_share_one_request() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let (a, b) = (seeded.player("A").clone(), seeded.player("B").clone());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let state = env.state.clone();
            let token = a.token.clone();
            tokio::spawn(async move { GameCommands::new(&state).submit_claim(&token, b.id).await })
        })
        .collect();

    let mut ids = Vec::new();
    let mut created = 0;
    for handle in handles {
        let submission = handle.await.expect("claim task panicked")?;
        ids.push(submission.request.id);
        if submission.created {
            created += 1;
        }
    }
    ids.dedup();
    assert_eq!(ids.len(), 1, "all claims should share one request");
    assert_eq!(created, 1);
    assert_eq!(
        kill_requests::list_pending_by_game(&env.state.db, &seeded.game_id)
            .await?
            .len(),
        1
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn parallel_eliminations_keep_a_single_ring() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let commands = GameCommands::new(&env.state);

    // A -> B and C -> D resolved at the same time.
    let ab = commands
        .submit_claim(&seeded.player("A").token, seeded.player("B").id)
        .await?;
    let cd = commands
        .submit_claim(&seeded.player("C").token, seeded.player("D").id)
        .await?;

    let handles: Vec<_> = [ab.request.id, cd.request.id]
        .into_iter()
        .map(|request_id| {
            let state = env.state.clone();
            let admin_token = seeded.admin_token.clone();
            tokio::spawn(async move {
                GameCommands::new(&state)
                    .approve(&admin_token, request_id)
                    .await
            })
        })
        .collect();
    // Interleaved approvals may lose the version bump with OPTIMISTIC_LOCK.
    let mut confirmed = 0;
    for handle in handles {
        match handle.await.expect("approve task panicked") {
            Ok(Resolution::Confirmed { .. }) => confirmed += 1,
            Ok(other) => panic!("unexpected resolution: {other:?}"),
            Err(err) => assert_eq!(err.code(), ErrorCode::OptimisticLock),
        }
    }
    assert!(confirmed >= 1);

    let links = crate::support::factory::living_links(&env.state, &seeded.game_id).await;
    assert_eq!(links.len(), 5 - confirmed);
    assert_eq!(hitlist::domain::verify_ring(&links), Ok(()));
    Ok(())
}
