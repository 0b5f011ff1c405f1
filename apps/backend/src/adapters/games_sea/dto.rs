//! DTOs for games_sea adapter.

use time::OffsetDateTime;

/// DTO for creating a new game. Identifiers and credentials are minted by
/// the caller so the adapter stays free of RNG concerns.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub id: String,
    pub name: String,
    pub admin_token: String,
}

impl GameCreate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        admin_token: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            admin_token: admin_token.into(),
        }
    }
}

/// Terminal transition: ACTIVE -> FINISHED with the surviving player.
#[derive(Debug, Clone)]
pub struct GameFinish {
    pub id: String,
    pub winner_id: i64,
    pub ended_at: OffsetDateTime,
    pub expected_version: i32,
}
