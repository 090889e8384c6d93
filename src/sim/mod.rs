//! Simulation core
//!
//! Bodies, arena, collisions and the epidemic state machine. This module
//! has no rendering or platform dependencies:
//! - Simulation clock only, never wall-clock time
//! - One RNG owned by the state
//! - Stable iteration order (by insertion, which is by id)

pub mod arena;
pub mod body;
pub mod collision;
pub mod epidemic;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use body::{Body, HealthState};
pub use collision::{ContactStats, detect_and_resolve, resolve_pair};
pub use epidemic::{EpidemicModel, EpidemicParams, advance, death_rate};
pub use state::{Counts, MAX_PLACEMENT_ATTEMPTS, SimulationState};
pub use tick::{FrameSummary, TickInput, tick};
