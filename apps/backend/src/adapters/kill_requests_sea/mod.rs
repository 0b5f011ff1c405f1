//! SeaORM adapter for kill requests.
//!
//! Status changes go through `transition_from_pending`, a conditional update
//! guarded by `status = 'PENDING'`. The row count it reports is the only
//! signal of who won a resolution race.

use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::kill_requests::{self, KillRequestStatus};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
) -> Result<Option<kill_requests::Model>, sea_orm::DbErr> {
    kill_requests::Entity::find_by_id(request_id).one(conn).await
}

/// The pending request for an exact (killer, victim) pair, if any.
pub async fn find_pending_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    killer_id: i64,
    victim_id: i64,
) -> Result<Option<kill_requests::Model>, sea_orm::DbErr> {
    kill_requests::Entity::find()
        .filter(kill_requests::Column::KillerId.eq(killer_id))
        .filter(kill_requests::Column::VictimId.eq(victim_id))
        .filter(kill_requests::Column::Status.eq(KillRequestStatus::Pending))
        .one(conn)
        .await
}

pub async fn create_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    killer_id: i64,
    victim_id: i64,
) -> Result<kill_requests::Model, sea_orm::DbErr> {
    let request = kill_requests::ActiveModel {
        id: NotSet,
        game_id: Set(game_id.to_string()),
        killer_id: Set(killer_id),
        victim_id: Set(victim_id),
        status: Set(KillRequestStatus::Pending),
        created_at: Set(time::OffsetDateTime::now_utc()),
        resolved_at: Set(None),
    };

    request.insert(conn).await
}

/// `UPDATE kill_requests SET status = :to, resolved_at = now
///  WHERE id = :id AND status = 'PENDING'`
///
/// Returns rows affected: 1 if this caller resolved the request, 0 if it
/// was already resolved (or does not exist).
pub async fn transition_from_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
    to: KillRequestStatus,
) -> Result<u64, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let result = kill_requests::Entity::update_many()
        .col_expr(
            kill_requests::Column::Status,
            Expr::val(to).as_enum(Alias::new("kill_request_status")),
        )
        .col_expr(kill_requests::Column::ResolvedAt, Expr::val(Some(now)).into())
        .filter(kill_requests::Column::Id.eq(request_id))
        .filter(kill_requests::Column::Status.eq(KillRequestStatus::Pending))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn list_pending_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<kill_requests::Model>, sea_orm::DbErr> {
    kill_requests::Entity::find()
        .filter(kill_requests::Column::GameId.eq(game_id))
        .filter(kill_requests::Column::Status.eq(KillRequestStatus::Pending))
        .order_by_asc(kill_requests::Column::Id)
        .all(conn)
        .await
}

pub async fn list_pending_for_victim<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    victim_id: i64,
) -> Result<Vec<kill_requests::Model>, sea_orm::DbErr> {
    kill_requests::Entity::find()
        .filter(kill_requests::Column::VictimId.eq(victim_id))
        .filter(kill_requests::Column::Status.eq(KillRequestStatus::Pending))
        .order_by_asc(kill_requests::Column::Id)
        .all(conn)
        .await
}

/// Confirmed kills credited to a player; must equal `players.kills`.
pub async fn count_confirmed_by_killer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    killer_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    use sea_orm::PaginatorTrait;

    kill_requests::Entity::find()
        .filter(kill_requests::Column::KillerId.eq(killer_id))
        .filter(kill_requests::Column::Status.eq(KillRequestStatus::Confirmed))
        .count(conn)
        .await
}
