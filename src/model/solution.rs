//! The immutable result snapshot.

/// A finished, feasible partition of orders into slabs.
///
/// Slabs are stored in deterministic order (ascending by their smallest
/// member id, members ascending within each slab) so that two runs with
/// the same seed produce byte-identical solutions. Only non-empty slabs
/// are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    slabs: Vec<Vec<usize>>,
    total_waste: u64,
}

impl Solution {
    /// Builds a solution from raw slabs, normalizing the ordering.
    ///
    /// The waste value is taken on trust here; use
    /// [`Evaluator::total_waste`](crate::eval::Evaluator::total_waste) to
    /// audit it independently.
    pub fn new(mut slabs: Vec<Vec<usize>>, total_waste: u64) -> Self {
        slabs.retain(|slab| !slab.is_empty());
        for slab in &mut slabs {
            slab.sort_unstable();
        }
        slabs.sort_unstable_by_key(|slab| slab[0]);
        Self { slabs, total_waste }
    }

    /// The slabs, each an ascending list of order ids.
    pub fn slabs(&self) -> &[Vec<usize>] {
        &self.slabs
    }

    /// Number of slabs actually used.
    pub fn slab_count(&self) -> usize {
        self.slabs.len()
    }

    /// Total sawtooth waste over all used slabs.
    pub fn total_waste(&self) -> u64 {
        self.total_waste
    }
}
