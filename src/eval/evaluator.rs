//! Sawtooth waste and feasibility checks.

use crate::model::{Instance, Solution, MAX_COLORS_PER_SLAB};
use smallvec::SmallVec;
use thiserror::Error;

/// Why a candidate partition is infeasible.
///
/// Reports the first violation found, in a fixed audit order: partition
/// totality first, then per-slab capacity and colors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InfeasibleSlabs {
    #[error("order id {id} is out of range for an instance with {order_count} orders")]
    OrderOutOfRange { id: usize, order_count: usize },

    #[error("order {id} appears in more than one slab")]
    OrderDuplicated { id: usize },

    #[error("order {id} is not assigned to any slab")]
    OrderMissing { id: usize },

    #[error("slab {slab} holds weight {weight}, above the largest catalog size {max_size}")]
    CapacityExceeded {
        slab: usize,
        weight: u64,
        max_size: u64,
    },

    #[error("slab {slab} holds {colors} distinct colors (limit 2)")]
    TooManyColors { slab: usize, colors: usize },

    #[error("recorded waste {recorded} does not match recomputed waste {recomputed}")]
    WasteMismatch { recorded: u64, recomputed: u64 },
}

/// Pure, side-effect-free scoring over an immutable instance.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
}

impl<'a> Evaluator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Sawtooth waste for a slab holding `weight`: the smallest catalog
    /// size at least `weight`, minus `weight`. `None` means the weight
    /// overflows the largest producible size. An empty slab wastes nothing.
    pub fn slab_waste(&self, weight: u64) -> Option<u64> {
        if weight == 0 {
            return Some(0);
        }
        self.instance
            .catalog()
            .next_size(weight)
            .map(|size| size - weight)
    }

    /// True iff a slab with this weight and color spread is producible.
    pub fn slab_feasible(&self, weight: u64, distinct_colors: usize) -> bool {
        weight <= self.instance.catalog().max_size() && distinct_colors <= MAX_COLORS_PER_SLAB
    }

    /// Scores an explicit partition: total sawtooth waste over non-empty
    /// slabs, or the first infeasibility found.
    ///
    /// Checks partition totality (every order in exactly one slab) as well
    /// as the capacity and color invariants, so it can audit solutions
    /// produced by any source, not just this crate's search.
    pub fn total_waste(&self, slabs: &[Vec<usize>]) -> Result<u64, InfeasibleSlabs> {
        let order_count = self.instance.order_count();
        let mut seen = vec![false; order_count];
        for slab in slabs {
            for &id in slab {
                if id >= order_count {
                    return Err(InfeasibleSlabs::OrderOutOfRange { id, order_count });
                }
                if seen[id] {
                    return Err(InfeasibleSlabs::OrderDuplicated { id });
                }
                seen[id] = true;
            }
        }
        if let Some(id) = seen.iter().position(|&s| !s) {
            return Err(InfeasibleSlabs::OrderMissing { id });
        }

        let max_size = self.instance.catalog().max_size();
        let mut total = 0u64;
        for (slab_idx, slab) in slabs.iter().enumerate() {
            if slab.is_empty() {
                continue;
            }
            let mut weight = 0u64;
            let mut colors: SmallVec<[u32; 4]> = SmallVec::new();
            for &id in slab {
                let order = self.instance.order(id);
                weight += order.weight;
                if !colors.contains(&order.color) {
                    colors.push(order.color);
                }
            }
            if weight > max_size {
                return Err(InfeasibleSlabs::CapacityExceeded {
                    slab: slab_idx,
                    weight,
                    max_size,
                });
            }
            if colors.len() > MAX_COLORS_PER_SLAB {
                return Err(InfeasibleSlabs::TooManyColors {
                    slab: slab_idx,
                    colors: colors.len(),
                });
            }
            // Within capacity, so next_size cannot overflow.
            total += self.slab_waste(weight).unwrap_or(0);
        }
        Ok(total)
    }

    /// Audits a [`Solution`]: recomputes its waste independently and
    /// checks it matches the recorded value.
    pub fn verify(&self, solution: &Solution) -> Result<(), InfeasibleSlabs> {
        let recomputed = self.total_waste(solution.slabs())?;
        if recomputed != solution.total_waste() {
            return Err(InfeasibleSlabs::WasteMismatch {
                recorded: solution.total_waste(),
                recomputed,
            });
        }
        Ok(())
    }
}
