//! Read models: what a player, the public and the admin get to see.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::repos::games::{self, Game};
use crate::repos::{kill_requests, players, tasks};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingClaim {
    pub request_id: i64,
    pub killer: PlayerRef,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A player's own view of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dossier {
    pub player_id: i64,
    pub game_id: String,
    pub game_name: String,
    pub game_status: GameStatus,
    pub name: String,
    pub is_alive: bool,
    pub kills: i32,
    pub target: Option<PlayerRef>,
    pub task: Option<String>,
    /// Claims against this player awaiting their confirmation.
    pub pending_claims: Vec<PendingClaim>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub player_id: i64,
    pub name: String,
    pub kills: i32,
    pub is_alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub game_id: String,
    pub game_name: String,
    pub status: GameStatus,
    pub winner_id: Option<i64>,
    pub entries: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminPlayer {
    pub id: i64,
    pub name: String,
    pub is_alive: bool,
    pub kills: i32,
    pub target_id: Option<i64>,
    pub task: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminTask {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminPendingRequest {
    pub id: i64,
    pub killer_id: i64,
    pub victim_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub game_id: String,
    pub name: String,
    pub status: GameStatus,
    pub winner_id: Option<i64>,
    pub version: i32,
    pub players: Vec<AdminPlayer>,
    pub tasks: Vec<AdminTask>,
    pub pending_requests: Vec<AdminPendingRequest>,
}

pub async fn dossier<C>(conn: &C, player_id: i64) -> Result<Dossier, AppError>
where
    C: ConnectionTrait + Send + Sync,
{
    let player = players::require_player(conn, player_id).await?;
    let game = games::require_game(conn, &player.game_id).await?;

    let target = match player.target_id {
        Some(id) => {
            let t = players::require_player(conn, id).await?;
            Some(PlayerRef {
                id: t.id,
                name: t.name,
            })
        }
        None => None,
    };
    let task = tasks::describe(conn, player.current_task_id).await?;

    let mut pending_claims = Vec::new();
    for request in kill_requests::list_pending_for_victim(conn, player.id).await? {
        let killer = players::require_player(conn, request.killer_id).await?;
        pending_claims.push(PendingClaim {
            request_id: request.id,
            killer: PlayerRef {
                id: killer.id,
                name: killer.name,
            },
            created_at: request.created_at,
        });
    }

    Ok(Dossier {
        player_id: player.id,
        game_id: game.id,
        game_name: game.name,
        game_status: game.status,
        name: player.name,
        is_alive: player.is_alive,
        kills: player.kills,
        target,
        task,
        pending_claims,
    })
}

/// Public ranking: most kills first, ties by name.
pub async fn scoreboard<C>(conn: &C, game_id: &str) -> Result<Scoreboard, AppError>
where
    C: ConnectionTrait + Send + Sync,
{
    let game = games::require_game(conn, game_id).await?;
    let mut entries: Vec<ScoreEntry> = players::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|p| ScoreEntry {
            player_id: p.id,
            name: p.name,
            kills: p.kills,
            is_alive: p.is_alive,
        })
        .collect();
    entries.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.name.cmp(&b.name)));

    Ok(Scoreboard {
        game_id: game.id,
        game_name: game.name,
        status: game.status,
        winner_id: game.winner_id,
        entries,
    })
}

pub async fn admin_overview<C>(
    conn: &C,
    game_id: &str,
    admin_token: &str,
) -> Result<AdminOverview, AppError>
where
    C: ConnectionTrait + Send + Sync,
{
    let Game {
        id,
        name,
        status,
        winner_id,
        version,
        ..
    } = games::require_admin(conn, game_id, admin_token).await?;

    let pool = tasks::list_by_game(conn, game_id).await?;
    let descriptions: HashMap<i64, &str> = pool
        .iter()
        .map(|t| (t.id, t.description.as_str()))
        .collect();

    let players = players::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|p| AdminPlayer {
            task: p
                .current_task_id
                .and_then(|tid| descriptions.get(&tid).map(|d| d.to_string())),
            id: p.id,
            name: p.name,
            is_alive: p.is_alive,
            kills: p.kills,
            target_id: p.target_id,
        })
        .collect();

    let pending_requests = kill_requests::list_pending_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|r| AdminPendingRequest {
            id: r.id,
            killer_id: r.killer_id,
            victim_id: r.victim_id,
            created_at: r.created_at,
        })
        .collect();

    let tasks = pool
        .iter()
        .map(|t| AdminTask {
            id: t.id,
            description: t.description.clone(),
        })
        .collect();

    Ok(AdminOverview {
        game_id: id,
        name,
        status,
        winner_id,
        version,
        players,
        tasks,
        pending_requests,
    })
}
