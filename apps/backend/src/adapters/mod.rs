//! SeaORM adapters. Functions are generic over `ConnectionTrait`, return
//! `DbErr`, and the repos layer maps to `DomainError` via `From<DbErr>`.

pub mod games_sea;
pub mod kill_requests_sea;
pub mod players_sea;
pub mod tasks_sea;
