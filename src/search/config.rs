//! Annealing configuration.

use std::time::Duration;

/// Configuration for one annealing replica.
///
/// # Examples
///
/// ```
/// use slabmill::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.98)
///     .with_max_iterations(100_000)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Minimum temperature. Annealing stops when T drops below this.
    pub min_temperature: f64,

    /// Geometric cooling factor in (0, 1): `T_{k+1} = cooling_rate * T_k`.
    pub cooling_rate: f64,

    /// Moves proposed at each temperature level.
    pub iterations_per_temperature: usize,

    /// Maximum total move proposals (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Stop after this many consecutive temperature steps without an
    /// improvement of the best feasible solution. 0 = no stall stop.
    pub stall_limit: usize,

    /// Optional wall-clock budget, checked once per temperature step.
    pub time_budget: Option<Duration>,

    /// Random seed for a fully reproducible trajectory.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1_000.0,
            min_temperature: 1e-3,
            cooling_rate: 0.97,
            iterations_per_temperature: 200,
            max_iterations: 500_000,
            stall_limit: 0,
            time_budget: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, alpha: f64) -> Self {
        self.cooling_rate = alpha;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_stall_limit(mut self, n: usize) -> Self {
        self.stall_limit = n;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be at least 1".into());
        }
        Ok(())
    }
}
