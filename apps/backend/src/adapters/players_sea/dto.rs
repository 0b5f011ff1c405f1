//! DTOs for players_sea adapter.

/// DTO for registering a player in a waiting game.
#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub game_id: String,
    pub name: String,
    pub contact: String,
    pub access_token: String,
}

/// One row of a ring assignment: who `player_id` hunts and with which task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetAssignment {
    pub player_id: i64,
    pub target_id: i64,
    pub task_id: Option<i64>,
}
