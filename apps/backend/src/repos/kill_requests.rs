//! Kill request repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::kill_requests_sea as kill_requests_adapter;
use crate::entities::kill_requests::{self, KillRequestStatus};
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq)]
pub struct KillRequest {
    pub id: i64,
    pub game_id: String,
    pub killer_id: i64,
    pub victim_id: i64,
    pub status: KillRequestStatus,
    pub created_at: time::OffsetDateTime,
    pub resolved_at: Option<time::OffsetDateTime>,
}

impl KillRequest {
    pub fn is_pending(&self) -> bool {
        self.status == KillRequestStatus::Pending
    }
}

impl From<kill_requests::Model> for KillRequest {
    fn from(model: kill_requests::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            killer_id: model.killer_id,
            victim_id: model.victim_id,
            status: model.status,
            created_at: model.created_at,
            resolved_at: model.resolved_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
) -> Result<Option<KillRequest>, DomainError> {
    let model = kill_requests_adapter::find_by_id(conn, request_id).await?;
    Ok(model.map(KillRequest::from))
}

pub async fn require_request<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
) -> Result<KillRequest, DomainError> {
    find_by_id(conn, request_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::KillRequest,
            format!("Kill request {request_id} not found"),
        )
    })
}

pub async fn find_pending_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    killer_id: i64,
    victim_id: i64,
) -> Result<Option<KillRequest>, DomainError> {
    let model = kill_requests_adapter::find_pending_pair(conn, killer_id, victim_id).await?;
    Ok(model.map(KillRequest::from))
}

/// Insert a pending request. A lost race against the partial unique index
/// surfaces as `Conflict(PendingClaimExists)` via the db error mapping.
pub async fn create_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    killer_id: i64,
    victim_id: i64,
) -> Result<KillRequest, DomainError> {
    let model = kill_requests_adapter::create_pending(conn, game_id, killer_id, victim_id).await?;
    Ok(KillRequest::from(model))
}

/// Compare-and-set out of PENDING. `true` iff this caller made the transition.
pub async fn transition_from_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request_id: i64,
    to: KillRequestStatus,
) -> Result<bool, DomainError> {
    let rows = kill_requests_adapter::transition_from_pending(conn, request_id, to).await?;
    Ok(rows == 1)
}

pub async fn list_pending_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<KillRequest>, DomainError> {
    let models = kill_requests_adapter::list_pending_by_game(conn, game_id).await?;
    Ok(models.into_iter().map(KillRequest::from).collect())
}

pub async fn list_pending_for_victim<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    victim_id: i64,
) -> Result<Vec<KillRequest>, DomainError> {
    let models = kill_requests_adapter::list_pending_for_victim(conn, victim_id).await?;
    Ok(models.into_iter().map(KillRequest::from).collect())
}

pub async fn count_confirmed_by_killer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    killer_id: i64,
) -> Result<u64, DomainError> {
    Ok(kill_requests_adapter::count_confirmed_by_killer(conn, killer_id).await?)
}
