//! Repository functions: domain models over the sea-orm adapters.

pub mod games;
pub mod kill_requests;
pub mod players;
pub mod tasks;
