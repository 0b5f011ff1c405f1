use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: String,
    pub name: String,
    pub contact: String,
    #[sea_orm(column_name = "access_token", unique)]
    pub access_token: String,
    #[sea_orm(column_name = "target_id")]
    pub target_id: Option<i64>,
    #[sea_orm(column_name = "is_alive")]
    pub is_alive: bool,
    pub kills: i32,
    #[sea_orm(column_name = "current_task_id")]
    pub current_task_id: Option<i64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "eliminated_at")]
    pub eliminated_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Game,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::TargetId",
        to = "Column::Id"
    )]
    Target,
    #[sea_orm(
        belongs_to = "super::tasks::Entity",
        from = "Column::CurrentTaskId",
        to = "super::tasks::Column::Id"
    )]
    CurrentTask,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentTask.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
