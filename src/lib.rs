//! Steel mill slab design optimization engine.
//!
//! Assigns a fixed set of orders (each with a weight and a color) to as
//! few slabs as necessary, drawn from a fixed catalog of discrete sizes,
//! minimizing total production waste under two hard constraints: a slab's
//! content cannot exceed the largest catalog size, and a slab carries at
//! most two distinct colors. Waste follows the sawtooth rule: a slab is
//! produced at the smallest catalog size that covers its content, and the
//! difference is wasted.
//!
//! # Architecture
//!
//! - [`model`]: immutable orders, size catalog, validated instance, and
//!   the [`Solution`](model::Solution) snapshot returned to callers.
//! - [`eval`]: pure sawtooth waste and feasibility scoring, usable to
//!   independently audit any partition.
//! - [`state`]: the mutable working partition with incrementally
//!   maintained per-slab aggregates and penalized cost.
//! - [`search`]: greedy construction plus a simulated-annealing engine
//!   over relocate / swap / merge / split neighborhood moves.
//! - [`optimizer`]: the multi-start facade running independent seeded
//!   replicas in parallel and selecting the best feasible solution.
//!
//! Parsing instance files, command-line handling, persistence, and
//! reporting are deliberately out of scope; callers hand in raw
//! `(sizes, color_count, orders)` and get a [`Solution`](model::Solution)
//! back.
//!
//! # Example
//!
//! ```
//! use slabmill::model::Instance;
//! use slabmill::optimizer::{Optimizer, OptimizerConfig};
//!
//! let instance = Instance::new(vec![10, 20], 3, vec![(6, 1), (6, 1), (15, 2)])?;
//! let config = OptimizerConfig::default().with_replicas(2).with_seed(42);
//!
//! let result = Optimizer::run(&instance, &config);
//! let best = result.best.expect("feasible instance");
//! assert_eq!(best.total_waste(), 13);
//! # Ok::<(), slabmill::model::InstanceError>(())
//! ```

pub mod eval;
pub mod model;
pub mod optimizer;
pub mod search;
pub mod state;
