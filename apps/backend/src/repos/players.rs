//! Player repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::players_sea as players_adapter;
use crate::entities::players;
use crate::errors::domain::{AuthKind, DomainError, NotFoundKind};
use crate::notify::Recipient;

pub use players_adapter::{PlayerCreate, TargetAssignment};

/// Player domain model (access token and contact excluded; see `Recipient`).
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub game_id: String,
    pub name: String,
    pub target_id: Option<i64>,
    pub is_alive: bool,
    pub kills: i32,
    pub current_task_id: Option<i64>,
    pub eliminated_at: Option<time::OffsetDateTime>,
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            name: model.name,
            target_id: model.target_id,
            is_alive: model.is_alive,
            kills: model.kills,
            current_task_id: model.current_task_id,
            eliminated_at: model.eliminated_at,
        }
    }
}

impl From<&players::Model> for Recipient {
    fn from(model: &players::Model) -> Self {
        Self {
            player_id: model.id,
            name: model.name.clone(),
            contact: model.contact.clone(),
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_id(conn, player_id).await?;
    Ok(player.map(Player::from))
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Player, DomainError> {
    find_by_id(conn, player_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Player, format!("Player {player_id} not found"))
    })
}

/// Resolve a bearer token to its player; unknown tokens are `NotAuthorized`.
pub async fn require_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    access_token: &str,
) -> Result<Player, DomainError> {
    players_adapter::find_by_access_token(conn, access_token)
        .await?
        .map(Player::from)
        .ok_or_else(|| {
            DomainError::not_authorized(AuthKind::PlayerToken, "Unknown player access token")
        })
}

pub async fn recipient<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Recipient, DomainError> {
    let model = players_adapter::find_by_id(conn, player_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("Player {player_id} not found"))
        })?;
    Ok(Recipient::from(&model))
}

pub async fn recipients_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<Recipient>, DomainError> {
    let models = players_adapter::list_by_game(conn, game_id).await?;
    Ok(models.iter().map(Recipient::from).collect())
}

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<Player>, DomainError> {
    let models = players_adapter::list_by_game(conn, game_id).await?;
    Ok(models.into_iter().map(Player::from).collect())
}

pub async fn list_alive<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<Player>, DomainError> {
    let models = players_adapter::list_alive(conn, game_id).await?;
    Ok(models.into_iter().map(Player::from).collect())
}

/// Create a player; returns the domain model and its access token.
pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<(Player, String), DomainError> {
    let model = players_adapter::create_player(conn, dto).await?;
    let token = model.access_token.clone();
    Ok((Player::from(model), token))
}

pub async fn assign_targets<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    assignments: &[TargetAssignment],
) -> Result<(), DomainError> {
    Ok(players_adapter::assign_targets(conn, game_id, assignments).await?)
}

pub async fn set_target<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    target_id: Option<i64>,
) -> Result<(), DomainError> {
    Ok(players_adapter::set_target(conn, player_id, target_id).await?)
}

pub async fn set_task<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    task_id: Option<i64>,
) -> Result<(), DomainError> {
    Ok(players_adapter::set_task(conn, player_id, task_id).await?)
}

pub async fn increment_kills<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<(), DomainError> {
    Ok(players_adapter::increment_kills(conn, player_id).await?)
}

/// Returns `false` if the player was already dead.
pub async fn eliminate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    at: time::OffsetDateTime,
) -> Result<bool, DomainError> {
    Ok(players_adapter::eliminate(conn, player_id, at).await? == 1)
}
