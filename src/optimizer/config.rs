//! Multi-start configuration.

use crate::search::SearchConfig;

/// Configuration for a multi-start optimization run.
///
/// Each replica gets `seed + replica_index` as its own seed, so the whole
/// run is reproducible from one number while replicas still explore
/// independent trajectories.
///
/// # Examples
///
/// ```
/// use slabmill::optimizer::OptimizerConfig;
/// use slabmill::search::SearchConfig;
///
/// let config = OptimizerConfig::default()
///     .with_replicas(8)
///     .with_seed(42)
///     .with_search(SearchConfig::default().with_max_iterations(100_000));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    /// Number of independent replicas. Must be at least 1.
    pub replicas: usize,

    /// Per-replica annealing parameters. Any seed set here is overridden
    /// by the derived per-replica seed.
    pub search: SearchConfig,

    /// Base seed. `None` draws a random base once per run.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            replicas: 4,
            search: SearchConfig::default(),
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.replicas == 0 {
            return Err("replicas must be at least 1".into());
        }
        self.search.validate()
    }
}
