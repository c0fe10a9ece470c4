//! Multi-start orchestration.
//!
//! The [`Optimizer`] runs a configured number of independent
//! [`SearchEngine`](crate::search::SearchEngine) replicas in parallel,
//! each with its own derived seed and private partition state, and keeps
//! the best feasible solution across all of them (lowest waste, ties by
//! fewest slabs). An infeasible outcome is reported distinctly: `best` is
//! `None` only when every replica failed to reach feasibility.

mod config;
mod runner;

pub use config::OptimizerConfig;
pub use runner::{OptimizeResult, Optimizer};
