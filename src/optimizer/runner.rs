//! Multi-start execution.

use super::config::OptimizerConfig;
use crate::model::{Instance, Solution};
use crate::search::{ReplicaResult, SearchEngine};
use rayon::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of a multi-start run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizeResult {
    /// Best feasible solution across all replicas, or `None` when no
    /// replica reached feasibility within budget (the INFEASIBLE outcome,
    /// distinct from a feasible-but-suboptimal solution).
    pub best: Option<Solution>,

    /// Index of the replica that produced `best`.
    pub best_replica: Option<usize>,

    /// Per-replica results, in replica order.
    pub replicas: Vec<ReplicaResult>,

    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

/// Orchestrates independent annealing replicas and selects the best
/// feasible solution: lowest total waste, ties broken by fewest used
/// slabs, then by earliest replica index.
///
/// Replicas run in parallel on the rayon pool. Each owns its partition
/// state and RNG exclusively; the instance is shared read-only. The only
/// cross-replica communication is the final best-of fold and the optional
/// cancellation flag.
pub struct Optimizer;

impl Optimizer {
    /// Runs the optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`OptimizerConfig::validate`] first to get a descriptive error).
    pub fn run(instance: &Instance, config: &OptimizerConfig) -> OptimizeResult {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs the optimization with a shared cancellation flag, polled by
    /// every replica once per temperature step.
    pub fn run_with_cancel(
        instance: &Instance,
        config: &OptimizerConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> OptimizeResult {
        config.validate().expect("invalid OptimizerConfig");

        let started = Instant::now();
        let base_seed = config.seed.unwrap_or_else(rand::random);

        let replicas: Vec<ReplicaResult> = (0..config.replicas)
            .into_par_iter()
            .map(|index| {
                let search = config
                    .search
                    .clone()
                    .with_seed(base_seed.wrapping_add(index as u64));
                let engine = SearchEngine::new(instance, search);
                let result = engine.run_with_cancel(cancel.as_deref());
                debug!(
                    replica = index,
                    feasible = result.best.is_some(),
                    waste = result.best.as_ref().map(|s| s.total_waste()),
                    iterations = result.iterations,
                    "replica finished"
                );
                result
            })
            .collect();

        let mut best: Option<Solution> = None;
        let mut best_replica = None;
        for (index, replica) in replicas.iter().enumerate() {
            let Some(candidate) = &replica.best else {
                continue;
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    (candidate.total_waste(), candidate.slab_count())
                        < (current.total_waste(), current.slab_count())
                }
            };
            if better {
                best = Some(candidate.clone());
                best_replica = Some(index);
            }
        }

        let elapsed = started.elapsed();
        match &best {
            Some(solution) => info!(
                waste = solution.total_waste(),
                slabs = solution.slab_count(),
                replica = best_replica,
                ?elapsed,
                "optimization finished"
            ),
            None => info!(?elapsed, "optimization finished without a feasible solution"),
        }

        OptimizeResult {
            best,
            best_replica,
            replicas,
            elapsed,
        }
    }
}
