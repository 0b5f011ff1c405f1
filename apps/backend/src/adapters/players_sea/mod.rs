//! SeaORM adapter for players.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::players;

pub mod dto;

pub use dto::{PlayerCreate, TargetAssignment};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

pub async fn find_by_access_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    access_token: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::AccessToken.eq(access_token))
        .one(conn)
        .await
}

/// All players of a game in registration order.
pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::GameId.eq(game_id))
        .order_by_asc(players::Column::Id)
        .all(conn)
        .await
}

pub async fn list_alive<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::GameId.eq(game_id))
        .filter(players::Column::IsAlive.eq(true))
        .order_by_asc(players::Column::Id)
        .all(conn)
        .await
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<players::Model, sea_orm::DbErr> {
    let player = players::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        name: Set(dto.name),
        contact: Set(dto.contact),
        access_token: Set(dto.access_token),
        target_id: Set(None),
        is_alive: Set(true),
        kills: Set(0),
        current_task_id: Set(None),
        created_at: Set(time::OffsetDateTime::now_utc()),
        eliminated_at: Set(None),
    };

    player.insert(conn).await
}

/// Write one ring edge (and task) per player. Callers run this on a
/// transaction so the whole ring lands or none of it does.
pub async fn assign_targets<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    assignments: &[TargetAssignment],
) -> Result<(), sea_orm::DbErr> {
    for a in assignments {
        let result = players::Entity::update_many()
            .col_expr(players::Column::TargetId, Expr::val(Some(a.target_id)).into())
            .col_expr(players::Column::CurrentTaskId, Expr::val(a.task_id).into())
            .filter(players::Column::Id.eq(a.player_id))
            .filter(players::Column::GameId.eq(game_id))
            .exec(conn)
            .await?;

        if result.rows_affected != 1 {
            return Err(sea_orm::DbErr::RecordNotFound(format!(
                "Player {} not found in game {game_id}",
                a.player_id
            )));
        }
    }
    Ok(())
}

/// Point `player_id` at a new target (`None` once the ring collapses).
pub async fn set_target<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    target_id: Option<i64>,
) -> Result<(), sea_orm::DbErr> {
    players::Entity::update_many()
        .col_expr(players::Column::TargetId, Expr::val(target_id).into())
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn set_task<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    task_id: Option<i64>,
) -> Result<(), sea_orm::DbErr> {
    players::Entity::update_many()
        .col_expr(players::Column::CurrentTaskId, Expr::val(task_id).into())
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Increment in SQL so concurrent writers cannot lose an update.
pub async fn increment_kills<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<(), sea_orm::DbErr> {
    players::Entity::update_many()
        .col_expr(
            players::Column::Kills,
            Expr::col(players::Column::Kills).add(1),
        )
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Mark a living player dead and detach target and task.
///
/// Returns the number of rows changed: 0 means the player was already dead.
pub async fn eliminate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    at: time::OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let result = players::Entity::update_many()
        .col_expr(players::Column::IsAlive, Expr::val(false).into())
        .col_expr(players::Column::TargetId, Expr::val(None::<i64>).into())
        .col_expr(players::Column::CurrentTaskId, Expr::val(None::<i64>).into())
        .col_expr(players::Column::EliminatedAt, Expr::val(Some(at)).into())
        .filter(players::Column::Id.eq(player_id))
        .filter(players::Column::IsAlive.eq(true))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
