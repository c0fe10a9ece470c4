//! Construction and simulated annealing.
//!
//! One [`SearchEngine`] is one replica: it builds an initial partition by
//! greedy first-fit-decreasing construction, then refines it with
//! simulated annealing over four reversible neighborhood moves (relocate,
//! swap, merge, split). Acceptance follows the Metropolis criterion on the
//! penalized cost with geometric cooling; the best *feasible* partition
//! seen is tracked separately from the annealing trajectory and is what
//! the replica reports.
//!
//! Engines are single-use: `Constructing -> Annealing -> Terminated`, no
//! phase is re-entered, and `run` consumes the engine.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod construction;
mod engine;
mod moves;

pub use config::SearchConfig;
pub use construction::greedy_assignment;
pub use engine::{Phase, ReplicaResult, SearchEngine};
pub use moves::{propose, AppliedMove, Move};
