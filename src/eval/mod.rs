//! Pure solution scoring.
//!
//! The [`Evaluator`] owns the sawtooth waste rule and the feasibility
//! checks (capacity and the two-color limit). It reads only the immutable
//! instance and keeps no state of its own, so scoring the same partition
//! twice always yields the same answer. The search layers use it for
//! construction-time feasibility checks; external callers use
//! [`Evaluator::total_waste`] to independently audit a returned solution.

mod evaluator;

pub use evaluator::{Evaluator, InfeasibleSlabs};
