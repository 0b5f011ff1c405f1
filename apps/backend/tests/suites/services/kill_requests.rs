use hitlist::domain::verify_ring;
use hitlist::entities::games::GameStatus;
use hitlist::entities::kill_requests::KillRequestStatus;
use hitlist::error::AppError;
use hitlist::errors::ErrorCode;
use hitlist::notify::{DeliveryOutcome, NoticeKind};
use hitlist::repos::{games, kill_requests, players};
use hitlist::services::{GameCommands, Resolution};

use crate::support::build_test_state;
use crate::support::factory::{force_ring, living_links, load, seed_started_game, seed_waiting_game};

const FIVE: [&str; 5] = ["A", "B", "C", "D", "E"];

#[tokio::test]
async fn duplicate_claim_returns_same_request_and_notifies_once() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    env.notifier.clear();

    let commands = GameCommands::new(&env.state);
    let (a, b) = (seeded.player("A"), seeded.player("B"));

    let first = commands.submit_claim(&a.token, b.id).await?;
    let second = commands.submit_claim(&a.token, b.id).await?;

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.request.id, second.request.id);
    assert_eq!(second.request.status, KillRequestStatus::Pending);

    let to_b = env.notifier.for_player(b.id);
    assert_eq!(
        to_b,
        vec![NoticeKind::KillClaimed {
            killer_name: "A".into(),
            request_id: first.request.id,
        }]
    );
    assert_eq!(env.notifier.deliveries().len(), 1);
    Ok(())
}

#[tokio::test]
async fn claim_validation_order() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let waiting = seed_waiting_game(&env.state, &["A", "B"], &[]).await?;
    let commands = GameCommands::new(&env.state);

    let err = commands
        .submit_claim(&waiting.player("A").token, waiting.player("B").id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotActive);

    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;

    // A hunts B, not C.
    let err = commands
        .submit_claim(&seeded.player("A").token, seeded.player("C").id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TargetMismatch);

    let err = commands
        .submit_claim("not-a-real-token", seeded.player("B").id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAuthorized);
    Ok(())
}

#[tokio::test]
async fn victim_confirmation_rewires_five_player_ring() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &["hum a tune"]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let commands = GameCommands::new(&env.state);
    let (b, c, d) = (seeded.player("B"), seeded.player("C"), seeded.player("D"));

    let claim = commands.submit_claim(&b.token, c.id).await?;
    env.notifier.clear();
    let resolution = commands
        .confirm_as_victim(&c.token, claim.request.id)
        .await?;

    assert_eq!(
        resolution,
        Resolution::Confirmed {
            request_id: claim.request.id,
            new_target_id: Some(d.id),
            winner_id: None,
        }
    );

    let b_now = load(&env.state, b).await;
    let c_now = load(&env.state, c).await;
    assert_eq!(b_now.target_id, Some(d.id));
    assert_eq!(b_now.kills, 1);
    assert!(b_now.current_task_id.is_some());
    assert!(!c_now.is_alive);
    assert_eq!(c_now.target_id, None);
    assert_eq!(c_now.current_task_id, None);
    assert!(c_now.eliminated_at.is_some());

    // B -> D -> E -> A -> B
    let links = living_links(&env.state, &seeded.game_id).await;
    assert_eq!(links.len(), 4);
    assert_eq!(verify_ring(&links), Ok(()));

    let request = kill_requests::require_request(&env.state.db, claim.request.id).await?;
    assert_eq!(request.status, KillRequestStatus::Confirmed);
    assert!(request.resolved_at.is_some());

    // Elimination notice first, then the killer's new target.
    let events: Vec<_> = env
        .notifier
        .deliveries()
        .into_iter()
        .map(|d| (d.recipient.player_id, d.kind))
        .collect();
    assert_eq!(
        events,
        vec![
            (
                c.id,
                NoticeKind::Eliminated {
                    killer_name: "B".into()
                }
            ),
            (
                b.id,
                NoticeKind::NewTarget {
                    target_name: "D".into(),
                    task: Some("hum a tune".into()),
                }
            ),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn admin_approval_in_two_player_game_declares_winner() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &["A", "B"], &[]).await?;
    let commands = GameCommands::new(&env.state);
    let (a, b) = (seeded.player("A"), seeded.player("B"));

    let claim = commands.submit_claim(&a.token, b.id).await?;
    env.notifier.clear();
    let resolution = commands
        .approve(&seeded.admin_token, claim.request.id)
        .await?;

    assert_eq!(
        resolution,
        Resolution::Confirmed {
            request_id: claim.request.id,
            new_target_id: None,
            winner_id: Some(a.id),
        }
    );

    let a_now = load(&env.state, a).await;
    assert_eq!(a_now.target_id, None);
    assert_eq!(a_now.kills, 1);
    assert!(!load(&env.state, b).await.is_alive);

    let game = games::require_game(&env.state.db, &seeded.game_id).await?;
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner_id, Some(a.id));
    assert!(game.ended_at.is_some());

    assert_eq!(
        env.notifier.for_player(a.id),
        vec![NoticeKind::Victory { kills: 1 }]
    );
    assert_eq!(
        env.notifier.for_player(b.id),
        vec![
            NoticeKind::Eliminated {
                killer_name: "A".into()
            },
            NoticeKind::GameOver {
                winner_name: "A".into()
            },
        ]
    );

    // Finished games take no new tasks.
    let err = commands
        .add_task(&seeded.game_id, &seeded.admin_token, "too late")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameFinished);
    Ok(())
}

#[tokio::test]
async fn second_resolution_is_a_no_op() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let commands = GameCommands::new(&env.state);
    let (a, b) = (seeded.player("A"), seeded.player("B"));

    let claim = commands.submit_claim(&a.token, b.id).await?;
    commands
        .confirm_as_victim(&b.token, claim.request.id)
        .await?;

    let again = commands
        .approve(&seeded.admin_token, claim.request.id)
        .await?;
    assert_eq!(
        again,
        Resolution::AlreadyResolved {
            request_id: claim.request.id
        }
    );
    let rejected = commands
        .reject(&seeded.admin_token, claim.request.id)
        .await?;
    assert_eq!(
        rejected,
        Resolution::AlreadyResolved {
            request_id: claim.request.id
        }
    );

    assert_eq!(load(&env.state, a).await.kills, 1);
    Ok(())
}

#[tokio::test]
async fn rejection_leaves_players_untouched_and_tells_killer() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let commands = GameCommands::new(&env.state);
    let (a, b) = (seeded.player("A"), seeded.player("B"));

    let claim = commands.submit_claim(&a.token, b.id).await?;
    env.notifier.clear();
    let resolution = commands
        .reject(&seeded.admin_token, claim.request.id)
        .await?;
    assert_eq!(
        resolution,
        Resolution::Rejected {
            request_id: claim.request.id
        }
    );

    let a_now = load(&env.state, a).await;
    assert_eq!(a_now.target_id, Some(b.id));
    assert_eq!(a_now.kills, 0);
    assert!(load(&env.state, b).await.is_alive);

    assert_eq!(
        env.notifier.for_player(a.id),
        vec![NoticeKind::ClaimRejected {
            victim_name: "B".into(),
            request_id: claim.request.id,
        }]
    );

    // The victim can no longer confirm a rejected claim.
    let late = commands
        .confirm_as_victim(&b.token, claim.request.id)
        .await?;
    assert_eq!(
        late,
        Resolution::AlreadyResolved {
            request_id: claim.request.id
        }
    );

    // A fresh claim on the same pair is a new request.
    let retry = commands.submit_claim(&a.token, b.id).await?;
    assert!(retry.created);
    assert_ne!(retry.request.id, claim.request.id);
    Ok(())
}

#[tokio::test]
async fn only_the_victim_may_confirm() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let commands = GameCommands::new(&env.state);

    let claim = commands
        .submit_claim(&seeded.player("A").token, seeded.player("B").id)
        .await?;

    let err = commands
        .confirm_as_victim(&seeded.player("C").token, claim.request.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotTheVictim);

    let other = seed_waiting_game(&env.state, &["X"], &[]).await?;
    let err = commands
        .approve(&other.admin_token, claim.request.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAuthorized);

    let err = commands
        .approve(&seeded.admin_token, 999_999)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::KillRequestNotFound);

    let request = kill_requests::require_request(&env.state.db, claim.request.id).await?;
    assert!(request.is_pending());
    Ok(())
}

#[tokio::test]
async fn claim_by_eliminated_killer_goes_stale() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &["A", "B", "C"], &[]).await?;
    force_ring(&env.state, &seeded, &["A", "B", "C"]).await?;
    let commands = GameCommands::new(&env.state);
    let (a, b, c) = (seeded.player("A"), seeded.player("B"), seeded.player("C"));

    // A claims B, but C gets A first.
    let stale = commands.submit_claim(&a.token, b.id).await?;
    let c_on_a = commands.submit_claim(&c.token, a.id).await?;
    commands
        .confirm_as_victim(&a.token, c_on_a.request.id)
        .await?;

    let resolution = commands
        .approve(&seeded.admin_token, stale.request.id)
        .await?;
    assert_eq!(
        resolution,
        Resolution::Stale {
            request_id: stale.request.id
        }
    );
    assert!(load(&env.state, b).await.is_alive);
    assert!(kill_requests::require_request(&env.state.db, stale.request.id)
        .await?
        .is_pending());

    // Dead players cannot claim.
    let err = commands.submit_claim(&a.token, b.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerEliminated);
    Ok(())
}

#[tokio::test]
async fn kills_match_confirmed_requests_through_to_victory() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    let commands = GameCommands::new(&env.state);
    let a = seeded.player("A");

    // A eliminates everyone in ring order.
    for victim in ["B", "C", "D", "E"] {
        let victim = seeded.player(victim);
        let claim = commands.submit_claim(&a.token, victim.id).await?;
        commands
            .confirm_as_victim(&victim.token, claim.request.id)
            .await?;

        let me = load(&env.state, a).await;
        let confirmed = kill_requests::count_confirmed_by_killer(&env.state.db, a.id).await?;
        assert_eq!(me.kills as u64, confirmed);
    }

    let a_now = load(&env.state, a).await;
    assert_eq!(a_now.kills, 4);
    // Empty pool: no task, no error.
    assert_eq!(a_now.current_task_id, None);

    let game = games::require_game(&env.state.db, &seeded.game_id).await?;
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner_id, Some(a.id));
    assert_eq!(players::list_alive(&env.state.db, &seeded.game_id).await?.len(), 1);

    let err = commands
        .submit_claim(&a.token, seeded.player("B").id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotActive);
    Ok(())
}

#[tokio::test]
async fn delivery_failures_do_not_roll_back_confirmation() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_started_game(&env.state, &FIVE, &[]).await?;
    force_ring(&env.state, &seeded, &FIVE).await?;
    env.notifier.fail_all();
    env.notifier.clear();
    let commands = GameCommands::new(&env.state);
    let (a, b, c) = (seeded.player("A"), seeded.player("B"), seeded.player("C"));

    let claim = commands.submit_claim(&a.token, b.id).await?;
    let resolution = commands
        .confirm_as_victim(&b.token, claim.request.id)
        .await?;
    assert_eq!(
        resolution,
        Resolution::Confirmed {
            request_id: claim.request.id,
            new_target_id: Some(c.id),
            winner_id: None,
        }
    );

    assert!(!load(&env.state, b).await.is_alive);
    assert_eq!(load(&env.state, a).await.target_id, Some(c.id));

    // Every notice was still attempted, in order, and every attempt failed.
    let attempts: Vec<_> = env
        .notifier
        .deliveries()
        .into_iter()
        .map(|d| (d.recipient.player_id, d.kind.event(), d.outcome))
        .collect();
    let order: Vec<_> = attempts.iter().map(|(id, event, _)| (*id, *event)).collect();
    assert_eq!(
        order,
        vec![
            (b.id, "kill_claimed"),
            (b.id, "eliminated"),
            (a.id, "new_target"),
        ]
    );
    assert!(attempts
        .iter()
        .all(|(_, _, outcome)| matches!(outcome, DeliveryOutcome::Failed(_))));
    Ok(())
}
