//! Logging helpers shared by adapters, services and middleware.

pub mod pii;
