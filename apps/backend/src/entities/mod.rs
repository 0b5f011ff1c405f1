pub mod games;
pub mod kill_requests;
pub mod players;
pub mod tasks;

pub use games::{Entity as Games, GameStatus};
pub use kill_requests::{Entity as KillRequests, KillRequestStatus};
pub use players::Entity as Players;
pub use tasks::Entity as Tasks;
