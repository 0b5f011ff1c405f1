use sea_orm::ConnectionTrait;

use crate::adapters::tasks_sea as tasks_adapter;
use crate::entities::tasks;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub game_id: String,
    pub description: String,
}

impl From<tasks::Model> for Task {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            description: model.description,
        }
    }
}

pub async fn create_task<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    description: &str,
) -> Result<Task, DomainError> {
    let model = tasks_adapter::create_task(conn, game_id, description).await?;
    Ok(Task::from(model))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    task_id: i64,
) -> Result<Option<Task>, DomainError> {
    let model = tasks_adapter::find_by_id(conn, task_id).await?;
    Ok(model.map(Task::from))
}

/// Description of an optional task reference.
pub async fn describe<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    task_id: Option<i64>,
) -> Result<Option<String>, DomainError> {
    match task_id {
        Some(id) => Ok(find_by_id(conn, id).await?.map(|t| t.description)),
        None => Ok(None),
    }
}

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<Task>, DomainError> {
    let models = tasks_adapter::list_by_game(conn, game_id).await?;
    Ok(models.into_iter().map(Task::from).collect())
}
