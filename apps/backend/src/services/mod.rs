//! Game services. Everything here takes an explicit connection or
//! transaction handle; `commands` owns transaction boundaries.

pub mod commands;
pub mod kill_requests;
pub mod lifecycle;
pub mod ring;
pub mod views;

pub use commands::GameCommands;
pub use kill_requests::{Resolution, Submission};
