//! Domain layer: pure game logic, no database or HTTP.

pub mod ring;

pub use ring::{build_ring, draw_task, rewire, verify_ring, RingLink, RingViolation};
