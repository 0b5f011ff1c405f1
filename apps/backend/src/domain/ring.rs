//! Target ring: the directed cycle of "who hunts whom" over living players.
//!
//! Pure functions over player ids; persistence lives in `services::ring`.
//! The ring is an id -> id relation (the `target_id` column), never an
//! in-memory pointer structure.

use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Minimum players for a ring.
pub const MIN_PLAYERS: usize = 2;

/// One directed edge: `player_id` hunts `target_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingLink {
    pub player_id: i64,
    pub target_id: i64,
}

/// First violation of the single-cycle invariant found by `verify_ring`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingViolation {
    Empty,
    SelfLoop { player_id: i64 },
    MissingTarget { player_id: i64 },
    DanglingTarget { player_id: i64, target_id: i64 },
    DuplicateTarget { target_id: i64 },
    SubCycle { reached: usize, alive: usize },
}

impl fmt::Display for RingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingViolation::Empty => write!(f, "no living players"),
            RingViolation::SelfLoop { player_id } => write!(f, "player {player_id} targets itself"),
            RingViolation::MissingTarget { player_id } => {
                write!(f, "living player {player_id} has no target")
            }
            RingViolation::DanglingTarget {
                player_id,
                target_id,
            } => write!(
                f,
                "player {player_id} targets {target_id}, who is not a living player"
            ),
            RingViolation::DuplicateTarget { target_id } => {
                write!(f, "player {target_id} is targeted more than once")
            }
            RingViolation::SubCycle { reached, alive } => {
                write!(f, "cycle covers {reached} of {alive} living players")
            }
        }
    }
}

impl std::error::Error for RingViolation {}

/// Uniformly random Hamiltonian cycle over `player_ids`.
///
/// Shuffles (Fisher-Yates) then links `order[i] -> order[(i + 1) % n]`.
/// Returns `None` for fewer than two players.
pub fn build_ring<R: Rng + ?Sized>(player_ids: &[i64], rng: &mut R) -> Option<Vec<RingLink>> {
    if player_ids.len() < MIN_PLAYERS {
        return None;
    }

    let mut order = player_ids.to_vec();
    order.shuffle(rng);

    let n = order.len();
    Some(
        (0..n)
            .map(|i| RingLink {
                player_id: order[i],
                target_id: order[(i + 1) % n],
            })
            .collect(),
    )
}

/// One task drawn uniformly with replacement; `None` on an empty pool.
pub fn draw_task<R: Rng + ?Sized>(task_ids: &[i64], rng: &mut R) -> Option<i64> {
    task_ids.choose(rng).copied()
}

/// New target for a killer who eliminated `victim`, given the victim's
/// former target. The killer takes over the victim's place in the ring;
/// when the victim was hunting the killer the ring has collapsed to one.
pub fn rewire(killer_id: i64, victim_target: Option<i64>) -> Option<i64> {
    victim_target.filter(|&t| t != killer_id)
}

/// Check that `links` (every living player and their target) form exactly
/// one directed cycle. A lone survivor with no target is a valid end state.
pub fn verify_ring(links: &[(i64, Option<i64>)]) -> Result<(), RingViolation> {
    match links {
        [] => return Err(RingViolation::Empty),
        [(_, None)] => return Ok(()),
        _ => {}
    }

    let alive: HashSet<i64> = links.iter().map(|(id, _)| *id).collect();
    let mut next = HashMap::with_capacity(links.len());
    let mut targeted = HashSet::with_capacity(links.len());

    for &(player_id, target) in links {
        let target_id = target.ok_or(RingViolation::MissingTarget { player_id })?;
        if target_id == player_id {
            return Err(RingViolation::SelfLoop { player_id });
        }
        if !alive.contains(&target_id) {
            return Err(RingViolation::DanglingTarget {
                player_id,
                target_id,
            });
        }
        if !targeted.insert(target_id) {
            return Err(RingViolation::DuplicateTarget { target_id });
        }
        next.insert(player_id, target_id);
    }

    // Targets are now a permutation of the living set; walk one orbit.
    let start = links[0].0;
    let mut current = start;
    let mut reached = 0;
    loop {
        reached += 1;
        current = next[&current];
        if current == start {
            break;
        }
    }

    if reached == alive.len() {
        Ok(())
    } else {
        Err(RingViolation::SubCycle {
            reached,
            alive: alive.len(),
        })
    }
}
