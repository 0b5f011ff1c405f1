//! SeaORM adapter for games - generic over ConnectionTrait.

use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::games::{self, GameStatus};
use crate::infra::db_errors::optimistic_lock_err;

pub mod dto;

pub use dto::{GameCreate, GameFinish};

fn status_value(status: GameStatus) -> SimpleExpr {
    Expr::val(status).as_enum(Alias::new("game_status"))
}

/// Apply an update guarded by `version = expected_version`, bump the
/// version, then refetch.
///
/// Zero rows affected means either the game is gone (`RecordNotFound`) or
/// another transaction bumped the version first (`OPTIMISTIC_LOCK` payload).
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: &str,
    expected_version: i32,
    configure_update: F,
) -> Result<games::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<games::Entity>) -> sea_orm::UpdateMany<games::Entity>,
{
    let result = configure_update(games::Entity::update_many())
        .col_expr(
            games::Column::Version,
            Expr::col(games::Column::Version).add(1),
        )
        .filter(games::Column::Id.eq(id))
        .filter(games::Column::Version.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, id).await? {
            Some(game) => Err(optimistic_lock_err(expected_version, game.version)),
            None => Err(sea_orm::DbErr::RecordNotFound(format!(
                "Game {id} not found"
            ))),
        };
    }

    require_game(conn, id).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id.to_string())
        .one(conn)
        .await
}

/// Find game by id or return `RecordNotFound`.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("Game {game_id} not found")))
}

pub async fn find_by_admin_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    admin_token: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::AdminToken.eq(admin_token))
        .one(conn)
        .await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let game = games::ActiveModel {
        id: Set(dto.id),
        name: Set(dto.name),
        status: Set(GameStatus::Waiting),
        admin_token: Set(dto.admin_token),
        winner_id: Set(None),
        version: Set(1),
        created_at: Set(time::OffsetDateTime::now_utc()),
        started_at: Set(None),
        ended_at: Set(None),
    };

    game.insert(conn).await
}

/// WAITING -> ACTIVE, stamping `started_at`.
pub async fn activate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
    expected_version: i32,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    optimistic_update_then_fetch(conn, id, expected_version, |update| {
        update
            .col_expr(games::Column::Status, status_value(GameStatus::Active))
            .col_expr(games::Column::StartedAt, Expr::val(Some(now)).into())
            .filter(games::Column::Status.eq(GameStatus::Waiting))
    })
    .await
}

/// ACTIVE -> FINISHED, recording the winner.
pub async fn finish<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameFinish,
) -> Result<games::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, &dto.id, dto.expected_version, |update| {
        update
            .col_expr(games::Column::Status, status_value(GameStatus::Finished))
            .col_expr(
                games::Column::WinnerId,
                Expr::val(Some(dto.winner_id)).into(),
            )
            .col_expr(games::Column::EndedAt, Expr::val(Some(dto.ended_at)).into())
            .filter(games::Column::Status.eq(GameStatus::Active))
    })
    .await
}

/// Version bump with no other change; serialises concurrent writers of one game.
pub async fn bump_version<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
    expected_version: i32,
) -> Result<games::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, id, expected_version, |update| update).await
}
