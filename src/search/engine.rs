//! Single-replica annealing loop.

use super::config::SearchConfig;
use super::construction::greedy_assignment;
use super::moves;
use crate::model::{Instance, Solution};
use crate::state::PartitionState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Lifecycle of an engine. Phases are never re-entered; an engine runs
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructing,
    Annealing,
    Terminated,
}

/// Result of one annealing replica.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicaResult {
    /// Best feasible solution observed, independent of where the
    /// annealing trajectory ended. `None` means the replica never reached
    /// feasibility.
    pub best: Option<Solution>,

    /// Total move proposals (including inapplicable draws).
    pub iterations: usize,

    /// Number of accepted moves.
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the stall limit triggered the stop.
    pub stalled: bool,

    /// Best feasible waste sampled once per temperature step.
    pub waste_history: Vec<u64>,
}

/// One search replica: greedy construction followed by simulated
/// annealing over the four neighborhood moves.
///
/// The engine owns its partition state and seeded RNG exclusively, so a
/// replica's trajectory is fully reproducible from its seed. Acceptance
/// uses the Metropolis criterion on the penalized cost; the best feasible
/// partition (lowest waste, ties by fewest slabs) is tracked separately
/// and is what [`run`](Self::run) returns.
pub struct SearchEngine<'a> {
    instance: &'a Instance,
    config: SearchConfig,
    phase: Phase,
}

impl<'a> SearchEngine<'a> {
    pub fn new(instance: &'a Instance, config: SearchConfig) -> Self {
        Self {
            instance,
            config,
            phase: Phase::Constructing,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the replica to termination.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`SearchConfig::validate`] first to get a descriptive error).
    pub fn run(self) -> ReplicaResult {
        self.run_with_cancel(None)
    }

    /// Runs the replica with an optional cooperative cancellation flag,
    /// polled once per temperature step so the engine only ever stops
    /// between consistent partition states.
    pub fn run_with_cancel(mut self, cancel: Option<&AtomicBool>) -> ReplicaResult {
        self.config.validate().expect("invalid SearchConfig");

        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        let deadline = self.config.time_budget.map(|budget| Instant::now() + budget);

        // Construction
        let assignment = greedy_assignment(self.instance);
        let mut state = PartitionState::from_assignment(self.instance, &assignment);
        self.phase = Phase::Annealing;

        let mut best: Option<Solution> = None;
        let mut best_key: Option<(u64, usize)> = None;
        if state.is_feasible() {
            best_key = Some((state.waste(), state.used_slab_count()));
            best = Some(state.snapshot());
        }

        let mut temperature = self.config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;
        let mut stalled = false;
        let mut stall = 0usize;
        let mut waste_history = Vec::new();
        if let Some((waste, _)) = best_key {
            waste_history.push(waste);
        }

        // Instances with at most one order are solved by construction.
        let trivial = self.instance.order_count() <= 1;

        'outer: while !trivial && temperature > self.config.min_temperature {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    break;
                }
            }

            let mut improved = false;
            for _ in 0..self.config.iterations_per_temperature {
                if self.config.max_iterations > 0 && iterations >= self.config.max_iterations {
                    break 'outer;
                }
                iterations += 1;

                let Some(mv) = moves::propose(&state, &mut rng) else {
                    continue;
                };
                let before = state.penalized_cost();
                let applied = mv.apply(&mut state);
                let after = state.penalized_cost();
                let delta = after as i128 - before as i128;

                // Metropolis acceptance criterion
                let accept = if delta <= 0 {
                    true
                } else {
                    let probability = (-(delta as f64) / temperature).exp();
                    rng.random_range(0.0..1.0) < probability
                };
                if !accept {
                    applied.undo(&mut state);
                    continue;
                }
                accepted_moves += 1;
                if delta < 0 {
                    improving_moves += 1;
                }

                if state.is_feasible() {
                    let key = (state.waste(), state.used_slab_count());
                    if best_key.is_none_or(|k| key < k) {
                        best_key = Some(key);
                        best = Some(state.snapshot());
                        improved = true;
                    }
                }
            }

            if let Some((waste, _)) = best_key {
                waste_history.push(waste);
            }
            if improved {
                stall = 0;
            } else {
                stall += 1;
                if self.config.stall_limit > 0 && stall >= self.config.stall_limit {
                    stalled = true;
                    break;
                }
            }

            temperature *= self.config.cooling_rate;
        }

        debug_assert!(state.check_consistency().is_ok());
        self.phase = Phase::Terminated;

        ReplicaResult {
            best,
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
            cancelled,
            stalled,
            waste_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Evaluator;

    fn spec_example() -> Instance {
        Instance::new(vec![10, 20], 3, vec![(6, 1), (6, 1), (15, 2)]).unwrap()
    }

    fn fast_config() -> SearchConfig {
        SearchConfig::default()
            .with_initial_temperature(50.0)
            .with_min_temperature(0.01)
            .with_cooling_rate(0.95)
            .with_iterations_per_temperature(100)
            .with_max_iterations(50_000)
            .with_seed(42)
    }

    #[test]
    fn test_end_to_end_example() {
        let instance = spec_example();
        let result = SearchEngine::new(&instance, fast_config()).run();

        let best = result.best.expect("expected a feasible solution");
        assert!(
            best.total_waste() <= 13,
            "expected waste <= 13, got {}",
            best.total_waste()
        );
        Evaluator::new(&instance).verify(&best).unwrap();
    }

    #[test]
    fn test_degenerate_single_order() {
        // one order, one catalog size: solved by construction alone
        let instance = Instance::new(vec![7], 1, vec![(5, 0)]).unwrap();
        let result = SearchEngine::new(&instance, fast_config()).run();

        let best = result.best.unwrap();
        assert_eq!(best.slab_count(), 1);
        assert_eq!(best.total_waste(), 2);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_empty_instance() {
        let instance = Instance::new(vec![7], 0, vec![]).unwrap();
        let result = SearchEngine::new(&instance, fast_config()).run();

        let best = result.best.unwrap();
        assert_eq!(best.slab_count(), 0);
        assert_eq!(best.total_waste(), 0);
    }

    #[test]
    fn test_reproducible_given_seed() {
        let instance = spec_example();
        let a = SearchEngine::new(&instance, fast_config()).run();
        let b = SearchEngine::new(&instance, fast_config()).run();

        assert_eq!(a.best, b.best);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.accepted_moves, b.accepted_moves);
        assert_eq!(a.waste_history, b.waste_history);
    }

    #[test]
    fn test_best_waste_history_non_increasing() {
        let instance = spec_example();
        let result = SearchEngine::new(&instance, fast_config()).run();

        for window in result.waste_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best waste history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_max_iterations_limit() {
        let instance = spec_example();
        let config = fast_config().with_max_iterations(100);
        let result = SearchEngine::new(&instance, config).run();

        assert!(
            result.iterations <= 100,
            "expected <= 100 iterations, got {}",
            result.iterations
        );
    }

    #[test]
    fn test_cancellation() {
        let instance = spec_example();
        // flag set up front: cancellation must be observed at the first
        // temperature step regardless of solver speed
        let cancel = AtomicBool::new(true);
        let result =
            SearchEngine::new(&instance, fast_config()).run_with_cancel(Some(&cancel));

        assert!(result.cancelled);
        // construction already ran, so a feasible best exists
        assert!(result.best.is_some());
    }

    #[test]
    fn test_stall_limit_stops_early() {
        let instance = spec_example();
        let config = fast_config()
            .with_initial_temperature(1e9)
            .with_min_temperature(1e-9)
            .with_stall_limit(3);
        let result = SearchEngine::new(&instance, config).run();

        assert!(result.stalled || result.iterations < 50_000);
    }

    #[test]
    fn test_infeasible_instance_reports_none() {
        // a single order heavier than the largest size can never fit
        let instance = Instance::new(vec![10], 1, vec![(11, 0), (5, 0)]).unwrap();
        let result = SearchEngine::new(&instance, fast_config()).run();

        assert!(result.best.is_none());
    }

    #[test]
    fn test_phase_starts_constructing() {
        let instance = spec_example();
        let engine = SearchEngine::new(&instance, fast_config());
        assert_eq!(engine.phase(), Phase::Constructing);
    }

    #[test]
    fn test_returned_solution_passes_audit() {
        let instance = Instance::new(
            vec![4, 9, 14, 20],
            4,
            vec![
                (5, 0),
                (3, 1),
                (8, 0),
                (2, 2),
                (7, 3),
                (4, 1),
                (6, 2),
                (9, 0),
                (3, 3),
                (5, 2),
            ],
        )
        .unwrap();
        let result = SearchEngine::new(&instance, fast_config()).run();

        let best = result.best.expect("instance is clearly feasible");
        Evaluator::new(&instance).verify(&best).unwrap();
    }
}
