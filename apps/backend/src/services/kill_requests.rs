//! Kill claims: submit, confirm (by victim or admin), reject, resolve.
//!
//! A request leaves PENDING exactly once. Both confirmation paths and
//! `reject` funnel into a compare-and-set on `status = PENDING`; whoever
//! loses that race observes `Resolution::AlreadyResolved`, which is a value
//! and not an error.

use rand::Rng;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entities::games::GameStatus;
use crate::entities::kill_requests::KillRequestStatus;
use crate::error::AppError;
use crate::errors::domain::{
    AuthKind, ConflictKind, DomainError, InfraErrorKind, InvalidStateKind,
};
use crate::notify::{Notice, NoticeKind};
use crate::repos::games::{self, Game};
use crate::repos::kill_requests::{self, KillRequest};
use crate::repos::players::{self, Player};
use crate::repos::tasks;
use crate::services::{lifecycle, ring};

/// Outcome of a confirm or reject call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// This call confirmed the kill. `new_target_id` is `None` when the
    /// killer won.
    Confirmed {
        request_id: i64,
        new_target_id: Option<i64>,
        winner_id: Option<i64>,
    },
    /// This call rejected the claim.
    Rejected { request_id: i64 },
    /// The request had already left PENDING; nothing changed.
    AlreadyResolved { request_id: i64 },
    /// The claim no longer matches the game (killer or victim dead, target
    /// moved on, game not active). Nothing changed; it stays pending.
    Stale { request_id: i64 },
}

/// Result of `submit`. `created` is false when an identical pending claim
/// already existed.
#[derive(Debug, Clone)]
pub struct Submission {
    pub request: KillRequest,
    pub created: bool,
}

/// Claim that `killer_id` eliminated `victim_id`.
///
/// Idempotent per (killer, victim) while pending: a repeat returns the
/// existing request and sends no second notice.
pub async fn submit(
    txn: &DatabaseTransaction,
    killer_id: i64,
    victim_id: i64,
) -> Result<(Submission, Vec<Notice>), AppError> {
    let killer = players::require_player(txn, killer_id).await?;
    let game = games::require_game(txn, &killer.game_id).await?;

    if game.status != GameStatus::Active {
        return Err(DomainError::invalid_state(
            InvalidStateKind::GameNotActive,
            "Kills can only be claimed in an active game",
        )
        .into());
    }
    if !killer.is_alive {
        return Err(DomainError::invalid_state(
            InvalidStateKind::PlayerEliminated,
            "Eliminated players cannot claim kills",
        )
        .into());
    }
    if killer.target_id != Some(victim_id) {
        debug!(killer_id, victim_id, target_id = ?killer.target_id, "claim on non-target");
        return Err(DomainError::not_authorized(
            AuthKind::TargetMismatch,
            "That player is not your current target",
        )
        .into());
    }

    if let Some(existing) = kill_requests::find_pending_pair(txn, killer_id, victim_id).await? {
        debug!(request_id = existing.id, "duplicate claim, returning pending request");
        return Ok((
            Submission {
                request: existing,
                created: false,
            },
            Vec::new(),
        ));
    }

    let (request, created) = insert_or_adopt(txn, &game.id, killer_id, victim_id).await?;
    if !created {
        return Ok((Submission { request, created }, Vec::new()));
    }

    let victim = players::recipient(txn, victim_id).await?;
    let notices = vec![Notice::new(
        victim,
        NoticeKind::KillClaimed {
            killer_name: killer.name.clone(),
            request_id: request.id,
        },
    )];

    info!(
        game_id = %game.id,
        request_id = request.id,
        killer_id,
        victim_id,
        "kill claimed"
    );
    Ok((
        Submission {
            request,
            created: true,
        },
        notices,
    ))
}

/// Insert a pending request, or adopt the one a concurrent submit inserted
/// first. Returns the request and whether this call created it.
async fn insert_or_adopt(
    txn: &DatabaseTransaction,
    game_id: &str,
    killer_id: i64,
    victim_id: i64,
) -> Result<(KillRequest, bool), AppError> {
    // Savepoint: a unique-index violation must not poison the outer transaction.
    let savepoint = txn.begin().await?;
    match kill_requests::create_pending(&savepoint, game_id, killer_id, victim_id).await {
        Ok(request) => {
            savepoint.commit().await?;
            Ok((request, true))
        }
        Err(DomainError::Conflict(ConflictKind::PendingClaimExists, _)) => {
            savepoint.rollback().await?;
            let winner = kill_requests::find_pending_pair(txn, killer_id, victim_id)
                .await?
                .ok_or_else(|| {
                    DomainError::conflict(
                        ConflictKind::PendingClaimExists,
                        "Concurrent claim vanished before it could be read",
                    )
                })?;
            debug!(request_id = winner.id, "lost insert race, returning pending request");
            Ok((winner, false))
        }
        Err(e) => Err(e.into()),
    }
}

/// The victim acknowledges the kill.
pub async fn confirm_by_victim<R>(
    txn: &DatabaseTransaction,
    request_id: i64,
    caller_id: i64,
    rng: &mut R,
) -> Result<(Resolution, Vec<Notice>), AppError>
where
    R: Rng + Send + ?Sized,
{
    let request = kill_requests::require_request(txn, request_id).await?;
    if request.victim_id != caller_id {
        return Err(DomainError::not_authorized(
            AuthKind::NotTheVictim,
            "Only the named victim can confirm this claim",
        )
        .into());
    }
    resolve(txn, request_id, rng).await
}

/// Admin override for disputed or unresponsive victims.
pub async fn confirm_by_admin<R>(
    txn: &DatabaseTransaction,
    request_id: i64,
    admin_token: &str,
    rng: &mut R,
) -> Result<(Resolution, Vec<Notice>), AppError>
where
    R: Rng + Send + ?Sized,
{
    let request = kill_requests::require_request(txn, request_id).await?;
    games::require_admin(txn, &request.game_id, admin_token).await?;
    resolve(txn, request_id, rng).await
}

/// Admin veto. Players are untouched; the killer is told.
pub async fn reject(
    txn: &DatabaseTransaction,
    request_id: i64,
    admin_token: &str,
) -> Result<(Resolution, Vec<Notice>), AppError> {
    let request = kill_requests::require_request(txn, request_id).await?;
    games::require_admin(txn, &request.game_id, admin_token).await?;

    if !kill_requests::transition_from_pending(txn, request_id, KillRequestStatus::Rejected).await?
    {
        debug!(request_id, "reject lost to an earlier resolution");
        return Ok((Resolution::AlreadyResolved { request_id }, Vec::new()));
    }

    let killer = players::recipient(txn, request.killer_id).await?;
    let victim = players::recipient(txn, request.victim_id).await?;
    let notices = vec![Notice::new(
        killer,
        NoticeKind::ClaimRejected {
            victim_name: victim.name,
            request_id,
        },
    )];

    info!(game_id = %request.game_id, request_id, "kill claim rejected");
    Ok((Resolution::Rejected { request_id }, notices))
}

/// Confirm a pending request and apply the elimination.
///
/// The status compare-and-set, the game version bump, the ring rewire,
/// the kill counter, the killer's new task and the win check all run on
/// `txn`; an observer never sees CONFIRMED without the rest.
pub async fn resolve<R>(
    txn: &DatabaseTransaction,
    request_id: i64,
    rng: &mut R,
) -> Result<(Resolution, Vec<Notice>), AppError>
where
    R: Rng + Send + ?Sized,
{
    let request = kill_requests::require_request(txn, request_id).await?;
    if !request.is_pending() {
        debug!(request_id, status = ?request.status, "request already resolved");
        return Ok((Resolution::AlreadyResolved { request_id }, Vec::new()));
    }

    let snapshot = ClaimSnapshot::load(txn, &request).await?;
    apply_confirmation(txn, snapshot, rng).await
}

/// Game, killer and victim as read when a pending request was picked up.
#[derive(Debug, Clone)]
struct ClaimSnapshot {
    request_id: i64,
    game: Game,
    killer: Player,
    victim: Player,
}

impl ClaimSnapshot {
    async fn load(txn: &DatabaseTransaction, request: &KillRequest) -> Result<Self, AppError> {
        Ok(Self {
            request_id: request.id,
            game: games::require_game(txn, &request.game_id).await?,
            killer: players::require_player(txn, request.killer_id).await?,
            victim: players::require_player(txn, request.victim_id).await?,
        })
    }

    fn still_valid(&self) -> bool {
        self.game.status == GameStatus::Active
            && self.killer.is_alive
            && self.victim.is_alive
            && self.killer.target_id == Some(self.victim.id)
    }
}

/// Everything after the pending check. The snapshot may be out of date by
/// now; the compare-and-set on the request status decides who wins.
async fn apply_confirmation<R>(
    txn: &DatabaseTransaction,
    snapshot: ClaimSnapshot,
    rng: &mut R,
) -> Result<(Resolution, Vec<Notice>), AppError>
where
    R: Rng + Send + ?Sized,
{
    let request_id = snapshot.request_id;
    if !snapshot.still_valid() {
        warn!(
            request_id,
            game_status = ?snapshot.game.status,
            killer_alive = snapshot.killer.is_alive,
            victim_alive = snapshot.victim.is_alive,
            "stale kill request left pending"
        );
        return Ok((Resolution::Stale { request_id }, Vec::new()));
    }

    if !kill_requests::transition_from_pending(txn, request_id, KillRequestStatus::Confirmed)
        .await?
    {
        debug!(request_id, "confirm lost to a concurrent resolution");
        return Ok((Resolution::AlreadyResolved { request_id }, Vec::new()));
    }

    let ClaimSnapshot {
        game, killer, victim, ..
    } = snapshot;

    // Serialises eliminations within one game; a concurrent one gets
    // OPTIMISTIC_LOCK and rolls back.
    let game = games::bump_version(txn, &game.id, game.version).await?;

    let new_target_id = ring::rewire(txn, &killer, &victim).await?;
    players::increment_kills(txn, killer.id).await?;
    let task_id = ring::draw_task(txn, &game.id, rng).await?;
    players::set_task(txn, killer.id, task_id).await?;

    let winner = lifecycle::check_win(txn, &game).await?;
    if winner.is_none() {
        ring::ensure_ring(txn, &game.id).await?;
    }

    let killer_recipient = players::recipient(txn, killer.id).await?;
    let victim_recipient = players::recipient(txn, victim.id).await?;
    let mut notices = vec![Notice::new(
        victim_recipient,
        NoticeKind::Eliminated {
            killer_name: killer.name.clone(),
        },
    )];

    match (&winner, new_target_id) {
        (Some(winner), _) => {
            notices.push(Notice::new(
                killer_recipient,
                NoticeKind::Victory {
                    kills: killer.kills + 1,
                },
            ));
            let roster = players::recipients_by_game(txn, &game.id).await?;
            notices.extend(lifecycle::others(roster, winner.id).into_iter().map(|r| {
                Notice::new(
                    r,
                    NoticeKind::GameOver {
                        winner_name: winner.name.clone(),
                    },
                )
            }));
        }
        (None, Some(target_id)) => {
            let target = players::require_player(txn, target_id).await?;
            notices.push(Notice::new(
                killer_recipient,
                NoticeKind::NewTarget {
                    target_name: target.name,
                    task: tasks::describe(txn, task_id).await?,
                },
            ));
        }
        (None, None) => {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Killer {} has no target but the game is not over", killer.id),
            )
            .into());
        }
    }

    info!(
        game_id = %game.id,
        request_id,
        killer_id = killer.id,
        victim_id = victim.id,
        new_target_id,
        "kill confirmed"
    );
    Ok((
        Resolution::Confirmed {
            request_id,
            new_target_id,
            winner_id: winner.map(|w| w.id),
        },
        notices,
    ))
}
