//! Neighborhood moves.
//!
//! Four reversible edits to a partition: relocate one order, swap two
//! orders across slabs, merge one slab into another, and split a slab in
//! two. A proposal draws the move kind uniformly, then operands uniformly
//! among applicable ones; structurally inapplicable draws (a merge with
//! more than two combined colors, a swap within one slab) are filtered at
//! proposal time rather than scored.

use crate::model::MAX_COLORS_PER_SLAB;
use crate::state::PartitionState;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

/// A fully determined neighborhood move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Move one order to another slab; `None` means a fresh slab.
    Relocate { order: usize, to: Option<usize> },

    /// Exchange two orders between their (distinct) slabs.
    Swap { a: usize, b: usize },

    /// Fold every order of `src` into `dst`.
    Merge { src: usize, dst: usize },

    /// Move `movers` (a proper, non-empty subset of the slab's members)
    /// onto a fresh slab.
    Split { label: usize, movers: Vec<usize> },
}

/// Undo information for an applied move.
#[derive(Debug, Clone)]
enum Undo {
    Relocate { order: usize, from: usize },
    Swap { a: usize, a_from: usize, b: usize, b_from: usize },
    Regroup { moved: Vec<usize>, from: usize },
}

/// A committed move that can be reverted exactly.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    undo: Undo,
}

impl Move {
    /// Applies the move to the state, returning the undo handle.
    pub fn apply(&self, state: &mut PartitionState<'_>) -> AppliedMove {
        let undo = match self {
            Move::Relocate { order, to } => {
                let to = to.unwrap_or_else(|| state.open_slab());
                let from = state.relocate(*order, to);
                Undo::Relocate { order: *order, from }
            }
            Move::Swap { a, b } => {
                let a_from = state.order_label(*a);
                let b_from = state.order_label(*b);
                state.relocate(*a, b_from);
                state.relocate(*b, a_from);
                Undo::Swap {
                    a: *a,
                    a_from,
                    b: *b,
                    b_from,
                }
            }
            Move::Merge { src, dst } => {
                let moved = state.slab_members(*src).to_vec();
                for &order in &moved {
                    state.relocate(order, *dst);
                }
                Undo::Regroup { moved, from: *src }
            }
            Move::Split { label, movers } => {
                let fresh = state.open_slab();
                for &order in movers {
                    state.relocate(order, fresh);
                }
                Undo::Regroup {
                    moved: movers.clone(),
                    from: *label,
                }
            }
        };
        AppliedMove { undo }
    }
}

impl AppliedMove {
    /// Reverts the move, restoring the exact previous partition.
    pub fn undo(self, state: &mut PartitionState<'_>) {
        match self.undo {
            Undo::Relocate { order, from } => {
                state.relocate(order, from);
            }
            Undo::Swap { a, a_from, b, b_from } => {
                state.relocate(a, a_from);
                state.relocate(b, b_from);
            }
            Undo::Regroup { moved, from } => {
                for order in moved {
                    state.relocate(order, from);
                }
            }
        }
    }
}

/// Proposes one move, or `None` when the draw is structurally
/// inapplicable. Callers just draw again; a skipped proposal still counts
/// against the iteration budget.
pub fn propose<R: Rng>(state: &PartitionState<'_>, rng: &mut R) -> Option<Move> {
    let n = state.order_count();
    if n < 2 {
        return None;
    }
    match rng.random_range(0..4u32) {
        0 => propose_relocate(state, rng),
        1 => propose_swap(state, rng),
        2 => propose_merge(state, rng),
        _ => propose_split(state, rng),
    }
}

fn propose_relocate<R: Rng>(state: &PartitionState<'_>, rng: &mut R) -> Option<Move> {
    let order = rng.random_range(0..state.order_count());
    let from = state.order_label(order);
    let mut targets: Vec<Option<usize>> = state
        .active_labels()
        .filter(|&label| label != from)
        .map(Some)
        .collect();
    // A fresh slab is only a real move when the order leaves company behind.
    if state.slab_members(from).len() > 1 {
        targets.push(None);
    }
    if targets.is_empty() {
        return None;
    }
    let to = targets[rng.random_range(0..targets.len())];
    Some(Move::Relocate { order, to })
}

fn propose_swap<R: Rng>(state: &PartitionState<'_>, rng: &mut R) -> Option<Move> {
    let n = state.order_count();
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a == b || state.order_label(a) == state.order_label(b) {
        return None;
    }
    Some(Move::Swap { a, b })
}

fn propose_merge<R: Rng>(state: &PartitionState<'_>, rng: &mut R) -> Option<Move> {
    let active: Vec<usize> = state.active_labels().collect();
    if active.len() < 2 {
        return None;
    }
    let i = rng.random_range(0..active.len());
    let mut j = rng.random_range(0..active.len() - 1);
    if j >= i {
        j += 1;
    }
    let (src, dst) = (active[i], active[j]);
    let mut combined: SmallVec<[u32; 4]> = state.slab_colors(dst);
    for color in state.slab_colors(src) {
        if !combined.contains(&color) {
            combined.push(color);
        }
    }
    if combined.len() > MAX_COLORS_PER_SLAB {
        return None;
    }
    Some(Move::Merge { src, dst })
}

fn propose_split<R: Rng>(state: &PartitionState<'_>, rng: &mut R) -> Option<Move> {
    let candidates: Vec<usize> = state
        .active_labels()
        .filter(|&label| state.slab_members(label).len() > 1)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let label = candidates[rng.random_range(0..candidates.len())];
    let members = state.slab_members(label);
    let colors = state.slab_colors(label);
    let movers: Vec<usize> = if colors.len() == 2 {
        // Two colors present: peel one color off onto its own slab.
        let color = colors[rng.random_range(0..2)];
        members
            .iter()
            .copied()
            .filter(|&order| state.instance().order(order).color == color)
            .collect()
    } else {
        // Single color: move a random proper, non-empty subset.
        let mut shuffled = members.to_vec();
        shuffled.shuffle(rng);
        let take = rng.random_range(1..shuffled.len());
        shuffled.truncate(take);
        shuffled
    };
    debug_assert!(!movers.is_empty() && movers.len() < members.len());
    Some(Move::Split { label, movers })
}
