//! Game lifecycle: WAITING -> ACTIVE -> FINISHED, never backwards.

use rand::Rng;
use sea_orm::DatabaseTransaction;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::adapters::games_sea::{GameCreate, GameFinish};
use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind, InvalidStateKind, ValidationKind};
use crate::notify::{Notice, NoticeKind, Recipient};
use crate::repos::games::{self, Game};
use crate::repos::players::{self, Player, PlayerCreate};
use crate::repos::tasks::{self, Task};
use crate::services::ring;
use crate::utils::credentials::{generate_game_code, generate_secret};

pub const MAX_NAME_CHARS: usize = 64;
pub const MAX_CONTACT_CHARS: usize = 254;
pub const MAX_TASK_CHARS: usize = 500;

/// A freshly created game and the only copy of its admin credential.
#[derive(Debug, Clone)]
pub struct CreatedGame {
    pub game: Game,
    pub admin_token: String,
}

/// A freshly registered player and the only copy of their access token.
#[derive(Debug, Clone)]
pub struct JoinedPlayer {
    pub player: Player,
    pub access_token: String,
}

/// Trim, NFC-normalise and length-check a display string.
fn clean_text(
    raw: &str,
    max_chars: usize,
    kind: ValidationKind,
    what: &str,
) -> Result<String, DomainError> {
    let cleaned: String = raw.trim().nfc().collect();
    let len = cleaned.chars().count();
    if len == 0 || len > max_chars {
        debug!(what, len, "rejected text input");
        return Err(DomainError::validation(
            kind,
            format!("{what} must be 1 to {max_chars} characters"),
        ));
    }
    Ok(cleaned)
}

pub async fn create_game(txn: &DatabaseTransaction, name: &str) -> Result<CreatedGame, AppError> {
    let name = clean_text(name, MAX_NAME_CHARS, ValidationKind::InvalidGameName, "Game name")?;

    let dto = GameCreate::new(generate_game_code()?, name, generate_secret()?);
    let (game, admin_token) = games::create_game(txn, dto).await?;

    info!(game_id = %game.id, "game created");
    Ok(CreatedGame { game, admin_token })
}

/// Register a player while the game is still waiting.
///
/// Bumps the game version so a concurrent `start` that already counted the
/// players loses its optimistic lock instead of leaving this player out of
/// the ring.
pub async fn add_player(
    txn: &DatabaseTransaction,
    game_id: &str,
    name: &str,
    contact: &str,
) -> Result<JoinedPlayer, AppError> {
    let name = clean_text(name, MAX_NAME_CHARS, ValidationKind::InvalidName, "Player name")?;
    let contact = clean_text(
        contact,
        MAX_CONTACT_CHARS,
        ValidationKind::InvalidContact,
        "Contact",
    )?;

    let game = games::require_game(txn, game_id).await?;
    if game.status != GameStatus::Waiting {
        return Err(DomainError::invalid_state(
            InvalidStateKind::GameNotWaiting,
            "Players can only join before the game starts",
        )
        .into());
    }

    let (player, access_token) = players::create_player(
        txn,
        PlayerCreate {
            game_id: game.id.clone(),
            name,
            contact,
            access_token: generate_secret()?,
        },
    )
    .await?;
    games::bump_version(txn, &game.id, game.version).await?;

    info!(game_id, player_id = player.id, "player joined");
    Ok(JoinedPlayer {
        player,
        access_token,
    })
}

/// Add a task to the pool. Allowed until the game finishes; tasks added
/// mid-game are only drawn at the next elimination.
pub async fn add_task(
    txn: &DatabaseTransaction,
    game_id: &str,
    admin_token: &str,
    description: &str,
) -> Result<Task, AppError> {
    let description = clean_text(
        description,
        MAX_TASK_CHARS,
        ValidationKind::InvalidTask,
        "Task description",
    )?;

    let game = games::require_admin(txn, game_id, admin_token).await?;
    if game.status == GameStatus::Finished {
        return Err(DomainError::invalid_state(
            InvalidStateKind::GameFinished,
            "Game has already finished",
        )
        .into());
    }

    let task = tasks::create_task(txn, game_id, &description).await?;
    debug!(game_id, task_id = task.id, "task added");
    Ok(task)
}

/// Build the ring, flip the game to ACTIVE and tell every player who they
/// are hunting.
pub async fn start<R>(
    txn: &DatabaseTransaction,
    game_id: &str,
    admin_token: &str,
    rng: &mut R,
) -> Result<(Game, Vec<Notice>), AppError>
where
    R: Rng + Send + ?Sized,
{
    let game = games::require_admin(txn, game_id, admin_token).await?;
    if game.status != GameStatus::Waiting {
        return Err(DomainError::invalid_state(
            InvalidStateKind::GameNotWaiting,
            "Game has already started",
        )
        .into());
    }

    let links = ring::build(txn, game_id, rng).await?;
    let game = games::activate(txn, game_id, game.version).await?;
    ring::ensure_ring(txn, game_id).await?;

    let roster = players::recipients_by_game(txn, game_id).await?;
    let name_of = |id: i64| {
        roster
            .iter()
            .find(|r| r.player_id == id)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    };

    let mut notices = Vec::with_capacity(links.len());
    for recipient in &roster {
        let player = players::require_player(txn, recipient.player_id).await?;
        let task = tasks::describe(txn, player.current_task_id).await?;
        notices.push(Notice::new(
            recipient.clone(),
            NoticeKind::GameStarted {
                game_name: game.name.clone(),
                target_name: player.target_id.map(name_of).unwrap_or_default(),
                task,
            },
        ));
    }

    info!(game_id, players = links.len(), "game started");
    Ok((game, notices))
}

/// Finish the game if exactly one player is left alive.
///
/// `game` must carry the version current inside this transaction. Zero
/// survivors cannot happen in a well-formed ring and is reported as
/// corruption so the transaction rolls back.
pub async fn check_win(
    txn: &DatabaseTransaction,
    game: &Game,
) -> Result<Option<Player>, AppError> {
    let alive = players::list_alive(txn, &game.id).await?;
    match alive.as_slice() {
        [] => Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Game {} has no living players", game.id),
        )
        .into()),
        [winner] => {
            games::finish(
                txn,
                GameFinish {
                    id: game.id.clone(),
                    winner_id: winner.id,
                    ended_at: time::OffsetDateTime::now_utc(),
                    expected_version: game.version,
                },
            )
            .await?;
            info!(game_id = %game.id, winner_id = winner.id, "game finished");
            Ok(Some(winner.clone()))
        }
        _ => Ok(None),
    }
}

/// Everyone in the game except `winner`, for game-over notices.
pub(crate) fn others(roster: Vec<Recipient>, winner_id: i64) -> Vec<Recipient> {
    roster
        .into_iter()
        .filter(|r| r.player_id != winner_id)
        .collect()
}
