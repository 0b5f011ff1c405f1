//! Game repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::games_sea as games_adapter;
use crate::entities::games::{self, GameStatus};
use crate::errors::domain::{AuthKind, DomainError, NotFoundKind};

/// Game domain model
///
/// The admin credential is deliberately absent: it is only ever compared,
/// never handed back out after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub status: GameStatus,
    pub winner_id: Option<i64>,
    pub version: i32,
    pub created_at: time::OffsetDateTime,
    pub started_at: Option<time::OffsetDateTime>,
    pub ended_at: Option<time::OffsetDateTime>,
}

impl From<games::Model> for Game {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            status: model.status,
            winner_id: model.winner_id,
            version: model.version,
            created_at: model.created_at,
            started_at: model.started_at,
            ended_at: model.ended_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    Ok(game.map(Game::from))
}

/// Find game by id or return `NotFound(Game)`.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Game, DomainError> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found")))
}

/// Load a game and check the admin credential against it.
///
/// Unknown game is `NotFound`; a credential for another game (or none at
/// all) is `NotAuthorized`.
pub async fn require_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    admin_token: &str,
) -> Result<Game, DomainError> {
    let model = games_adapter::find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
        })?;

    if model.admin_token != admin_token {
        return Err(DomainError::not_authorized(
            AuthKind::AdminCredential,
            "Admin credential does not match this game",
        ));
    }
    Ok(Game::from(model))
}

/// Create a game; returns the domain model and its admin credential.
pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: games_adapter::GameCreate,
) -> Result<(Game, String), DomainError> {
    let model = games_adapter::create_game(conn, dto).await?;
    let admin_token = model.admin_token.clone();
    Ok((Game::from(model), admin_token))
}

pub async fn activate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    expected_version: i32,
) -> Result<Game, DomainError> {
    let model = games_adapter::activate(conn, game_id, expected_version).await?;
    Ok(Game::from(model))
}

pub async fn finish<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: games_adapter::GameFinish,
) -> Result<Game, DomainError> {
    let model = games_adapter::finish(conn, dto).await?;
    Ok(Game::from(model))
}

pub async fn bump_version<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    expected_version: i32,
) -> Result<Game, DomainError> {
    let model = games_adapter::bump_version(conn, game_id, expected_version).await?;
    Ok(Game::from(model))
}
