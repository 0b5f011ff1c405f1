//! Persisting the target ring: initial build at game start and the
//! rewiring step of a confirmed elimination.

use rand::Rng;
use sea_orm::ConnectionTrait;
use tracing::{debug, error};

use crate::domain::ring::{self, RingLink, MIN_PLAYERS};
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::players::{self, Player, TargetAssignment};
use crate::repos::tasks;

/// Build a uniformly random ring over every player of `game_id` and attach
/// one task per player, drawn with replacement from the game's pool.
///
/// All writes go through `conn`; run it on a transaction so a crash never
/// leaves half a ring behind.
pub async fn build<C, R>(conn: &C, game_id: &str, rng: &mut R) -> Result<Vec<RingLink>, AppError>
where
    C: ConnectionTrait + Send + Sync,
    R: Rng + Send + ?Sized,
{
    let player_ids: Vec<i64> = players::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    let links = ring::build_ring(&player_ids, rng)
        .ok_or_else(|| DomainError::insufficient_players(MIN_PLAYERS, player_ids.len()))?;

    let task_ids = task_pool(conn, game_id).await?;
    let assignments: Vec<TargetAssignment> = links
        .iter()
        .map(|link| TargetAssignment {
            player_id: link.player_id,
            target_id: link.target_id,
            task_id: ring::draw_task(&task_ids, rng),
        })
        .collect();

    players::assign_targets(conn, game_id, &assignments).await?;
    debug!(
        game_id,
        players = links.len(),
        tasks = task_ids.len(),
        "ring assigned"
    );

    Ok(links)
}

/// Remove `victim` from the ring and hand their target to `killer`.
///
/// Returns the killer's new target; `None` means the ring has collapsed to
/// the killer alone.
pub async fn rewire<C>(conn: &C, killer: &Player, victim: &Player) -> Result<Option<i64>, AppError>
where
    C: ConnectionTrait + Send + Sync,
{
    let new_target = ring::rewire(killer.id, victim.target_id);

    let eliminated = players::eliminate(conn, victim.id, time::OffsetDateTime::now_utc()).await?;
    if !eliminated {
        return Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Player {} was eliminated twice", victim.id),
        )
        .into());
    }
    players::set_target(conn, killer.id, new_target).await?;

    Ok(new_target)
}

/// One task from the game's pool, or `None` when the pool is empty.
pub async fn draw_task<C, R>(conn: &C, game_id: &str, rng: &mut R) -> Result<Option<i64>, AppError>
where
    C: ConnectionTrait + Send + Sync,
    R: Rng + Send + ?Sized,
{
    let task_ids = task_pool(conn, game_id).await?;
    Ok(ring::draw_task(&task_ids, rng))
}

/// Re-read the living players and check they still form one cycle.
pub async fn ensure_ring<C>(conn: &C, game_id: &str) -> Result<(), AppError>
where
    C: ConnectionTrait + Send + Sync,
{
    let links: Vec<(i64, Option<i64>)> = players::list_alive(conn, game_id)
        .await?
        .into_iter()
        .map(|p| (p.id, p.target_id))
        .collect();

    ring::verify_ring(&links).map_err(|violation| {
        error!(game_id, %violation, "ring invariant violated");
        AppError::from(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Ring for game {game_id} is broken: {violation}"),
        ))
    })
}

async fn task_pool<C>(conn: &C, game_id: &str) -> Result<Vec<i64>, AppError>
where
    C: ConnectionTrait + Send + Sync,
{
    Ok(tasks::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect())
}
