//! Error codes for the Hitlist backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Hitlist backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Missing or malformed Bearer token
    Unauthorized,
    /// Token or admin credential does not match the entity acted on
    NotAuthorized,
    /// Killer's current target is not the claimed victim
    TargetMismatch,
    /// Caller is not the victim named in the kill request
    NotTheVictim,

    // Request Validation
    /// Player display name empty or too long
    InvalidName,
    /// Contact address empty or too long
    InvalidContact,
    /// Task description empty or too long
    InvalidTask,
    /// Game name empty or too long
    InvalidGameName,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Game / request state
    /// Operation requires a game in the waiting state
    GameNotWaiting,
    /// Operation requires an active game
    GameNotActive,
    /// Game already finished
    GameFinished,
    /// Player has been eliminated
    PlayerEliminated,
    /// Fewer than two players at start
    InsufficientPlayers,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// Player not found
    PlayerNotFound,
    /// Kill request not found
    KillRequestNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Display name already used in this game
    DuplicatePlayerName,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Unique constraint violation (generic)
    UniqueViolation,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Stored state violates a game invariant
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::TargetMismatch => "TARGET_MISMATCH",
            Self::NotTheVictim => "NOT_THE_VICTIM",

            Self::InvalidName => "INVALID_NAME",
            Self::InvalidContact => "INVALID_CONTACT",
            Self::InvalidTask => "INVALID_TASK",
            Self::InvalidGameName => "INVALID_GAME_NAME",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotWaiting => "GAME_NOT_WAITING",
            Self::GameNotActive => "GAME_NOT_ACTIVE",
            Self::GameFinished => "GAME_FINISHED",
            Self::PlayerEliminated => "PLAYER_ELIMINATED",
            Self::InsufficientPlayers => "INSUFFICIENT_PLAYERS",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::KillRequestNotFound => "KILL_REQUEST_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::DuplicatePlayerName => "DUPLICATE_PLAYER_NAME",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
