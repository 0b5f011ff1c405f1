//! SeaORM adapter for the per-game task pool.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::tasks;

pub async fn create_task<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    description: &str,
) -> Result<tasks::Model, sea_orm::DbErr> {
    let task = tasks::ActiveModel {
        id: NotSet,
        game_id: Set(game_id.to_string()),
        description: Set(description.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    task.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    task_id: i64,
) -> Result<Option<tasks::Model>, sea_orm::DbErr> {
    tasks::Entity::find_by_id(task_id).one(conn).await
}

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<tasks::Model>, sea_orm::DbErr> {
    tasks::Entity::find()
        .filter(tasks::Column::GameId.eq(game_id))
        .order_by_asc(tasks::Column::Id)
        .all(conn)
        .await
}
