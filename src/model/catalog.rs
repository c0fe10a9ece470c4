//! The catalog of producible slab sizes.

use super::instance::InstanceError;

/// Immutable, strictly ascending sequence of producible slab sizes.
///
/// The catalog answers the one query the whole engine is built on:
/// "what is the smallest size that can hold this content weight?"
/// Catalog values are arbitrary, so this is a binary search over the
/// stored sizes rather than any closed-form rounding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    sizes: Vec<u64>,
    max_size: u64,
}

impl Catalog {
    /// Builds a catalog, validating that sizes are positive and strictly
    /// ascending.
    pub fn new(sizes: Vec<u64>) -> Result<Self, InstanceError> {
        let Some(&first) = sizes.first() else {
            return Err(InstanceError::EmptyCatalog);
        };
        if first == 0 {
            return Err(InstanceError::ZeroSize { position: 0 });
        }
        for (i, pair) in sizes.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(InstanceError::UnsortedCatalog {
                    position: i + 1,
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }
        let max_size = sizes[sizes.len() - 1];
        Ok(Self { sizes, max_size })
    }

    /// Smallest catalog size `>= weight`, or `None` if the weight exceeds
    /// the largest producible size (the overflow sentinel).
    pub fn next_size(&self, weight: u64) -> Option<u64> {
        let idx = self.sizes.partition_point(|&s| s < weight);
        self.sizes.get(idx).copied()
    }

    /// The largest producible size; the hard capacity of any slab.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// All sizes, ascending.
    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false for a constructed catalog; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
