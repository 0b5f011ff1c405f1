use hitlist::entities::games::GameStatus;
use hitlist::error::AppError;
use hitlist::errors::ErrorCode;
use hitlist::services::views::PlayerRef;
use hitlist::services::GameCommands;

use crate::support::build_test_state;
use crate::support::factory::{force_ring, seed_started_game, seed_waiting_game};

#[tokio::test]
async fn dossier_shows_target_task_and_pending_claims() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let names = ["A", "B", "C"];
    let seeded = seed_started_game(&env.state, &names, &["whistle"]).await?;
    force_ring(&env.state, &seeded, &names).await?;
    let commands = GameCommands::new(&env.state);
    let (a, b) = (seeded.player("A"), seeded.player("B"));

    let mine = commands.dossier(&a.token).await?;
    assert_eq!(mine.player_id, a.id);
    assert_eq!(mine.game_status, GameStatus::Active);
    assert_eq!(
        mine.target,
        Some(PlayerRef {
            id: b.id,
            name: "B".into()
        })
    );
    assert_eq!(mine.task.as_deref(), Some("whistle"));
    assert!(mine.pending_claims.is_empty());

    let claim = commands.submit_claim(&a.token, b.id).await?;
    let victim_view = commands.dossier(&b.token).await?;
    assert_eq!(victim_view.pending_claims.len(), 1);
    assert_eq!(victim_view.pending_claims[0].request_id, claim.request.id);
    assert_eq!(victim_view.pending_claims[0].killer.name, "A");

    commands.confirm_as_victim(&b.token, claim.request.id).await?;
    let dead = commands.dossier(&b.token).await?;
    assert!(!dead.is_alive);
    assert_eq!(dead.target, None);
    assert_eq!(dead.task, None);
    assert!(dead.pending_claims.is_empty());
    Ok(())
}

#[tokio::test]
async fn scoreboard_orders_by_kills_then_name() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let names = ["Dan", "Bea", "Cy", "Al"];
    let seeded = seed_started_game(&env.state, &names, &[]).await?;
    force_ring(&env.state, &seeded, &names).await?;
    let commands = GameCommands::new(&env.state);

    // Cy kills Al.
    let claim = commands
        .submit_claim(&seeded.player("Cy").token, seeded.player("Al").id)
        .await?;
    commands
        .approve(&seeded.admin_token, claim.request.id)
        .await?;

    let board = commands.scoreboard(&seeded.game_id).await?;
    let order: Vec<(&str, i32, bool)> = board
        .entries
        .iter()
        .map(|e| (e.name.as_str(), e.kills, e.is_alive))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Cy", 1, true),
            ("Al", 0, false),
            ("Bea", 0, true),
            ("Dan", 0, true),
        ]
    );
    assert_eq!(board.winner_id, None);
    Ok(())
}

#[tokio::test]
async fn admin_overview_requires_admin_token() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let seeded = seed_waiting_game(&env.state, &["A", "B"], &["juggle"]).await?;
    let commands = GameCommands::new(&env.state);

    let overview = commands
        .admin_overview(&seeded.game_id, &seeded.admin_token)
        .await?;
    assert_eq!(overview.status, GameStatus::Waiting);
    assert_eq!(overview.players.len(), 2);
    assert_eq!(overview.tasks.len(), 1);
    assert!(overview.pending_requests.is_empty());

    let err = commands
        .admin_overview(&seeded.game_id, &seeded.players[0].token)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAuthorized);

    let err = commands.dossier("unknown").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAuthorized);
    Ok(())
}
