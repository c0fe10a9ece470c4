//! Mutable working partition.
//!
//! [`PartitionState`] is the single mutable structure of a search replica:
//! which slab each order sits on, plus per-slab aggregates (content weight,
//! color multiset, member list) maintained incrementally so a move never
//! needs a full re-scan. The penalized cost it tracks is the annealing
//! objective from the search layer: sawtooth waste plus a per-unit penalty
//! for capacity and color violations, so transiently infeasible states are
//! costly rather than forbidden.
//!
//! Each replica owns exactly one `PartitionState`; it is never shared.

mod partition;

pub use partition::PartitionState;
