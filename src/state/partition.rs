//! Incrementally maintained partition aggregates.

use crate::model::{Instance, Solution, MAX_COLORS_PER_SLAB};
use smallvec::SmallVec;

/// Per-slab aggregates. `colors` is a small multiset of (color, count)
/// pairs; slabs hold few distinct colors even while transiently violating
/// the two-color limit, so inline storage covers the common case.
#[derive(Debug, Clone, Default)]
struct SlabAgg {
    weight: u64,
    members: Vec<usize>,
    colors: SmallVec<[(u32, u32); 4]>,
}

impl SlabAgg {
    fn distinct_colors(&self) -> usize {
        self.colors.len()
    }

    fn add_color(&mut self, color: u32) {
        if let Some(entry) = self.colors.iter_mut().find(|(c, _)| *c == color) {
            entry.1 += 1;
        } else {
            self.colors.push((color, 1));
        }
    }

    fn remove_color(&mut self, color: u32) {
        let idx = self
            .colors
            .iter()
            .position(|(c, _)| *c == color)
            .expect("color multiset out of sync with members");
        self.colors[idx].1 -= 1;
        if self.colors[idx].1 == 0 {
            self.colors.swap_remove(idx);
        }
    }

    /// Distinct colors if `color` were added (without mutating).
    fn distinct_colors_with(&self, color: u32) -> usize {
        if self.colors.iter().any(|(c, _)| *c == color) {
            self.colors.len()
        } else {
            self.colors.len() + 1
        }
    }

    /// Distinct colors if one member of `color` were removed.
    fn distinct_colors_without(&self, color: u32) -> usize {
        match self.colors.iter().find(|(c, _)| *c == color) {
            Some(&(_, 1)) => self.colors.len() - 1,
            _ => self.colors.len(),
        }
    }
}

/// The mutable working partition of one search replica.
///
/// Tracks the slab label of every order plus per-slab weight, color
/// multiset, and member list, and keeps the penalized annealing cost
/// (sawtooth waste + per-unit violation penalties) in sync with every
/// mutation. All mutations are O(members of the touched slab) at worst,
/// with an O(log k) catalog lookup; the delta queries are O(1) on the
/// aggregates plus the same lookup.
///
/// Empty slab labels are retained and reused by [`open_slab`](Self::open_slab)
/// rather than compacted, so labels held by in-flight undo information
/// stay valid.
#[derive(Debug, Clone)]
pub struct PartitionState<'a> {
    instance: &'a Instance,
    assignment: Vec<usize>,
    slabs: Vec<SlabAgg>,
    penalty_unit: u64,
    waste: u64,
    penalty: u64,
    used: usize,
}

impl<'a> PartitionState<'a> {
    /// Builds state from a full order-to-label assignment.
    ///
    /// Labels need not be contiguous; slabs are sized to the largest label.
    /// The assignment may be infeasible; violations show up as penalty.
    pub fn from_assignment(instance: &'a Instance, assignment: &[usize]) -> Self {
        debug_assert_eq!(assignment.len(), instance.order_count());
        let slab_count = assignment.iter().copied().max().map_or(0, |m| m + 1);
        let mut state = Self {
            instance,
            assignment: vec![0; assignment.len()],
            slabs: (0..slab_count).map(|_| SlabAgg::default()).collect(),
            // Strictly larger than any partition's total waste (at most
            // max_size per used slab), so one unit of violation always
            // outweighs any waste improvement.
            penalty_unit: instance
                .total_weight()
                .saturating_add(
                    instance
                        .catalog()
                        .max_size()
                        .saturating_mul(instance.order_count() as u64),
                )
                .saturating_add(1),
            waste: 0,
            penalty: 0,
            used: 0,
        };
        for (order, &label) in assignment.iter().enumerate() {
            state.add_order(order, label);
        }
        state
    }

    /// Waste + penalty for a slab with the given aggregates.
    fn cost_parts(&self, weight: u64, distinct_colors: usize) -> (u64, u64) {
        let max_size = self.instance.catalog().max_size();
        let mut penalty = 0u64;
        let waste = if weight == 0 {
            0
        } else if weight > max_size {
            penalty = (weight - max_size).saturating_mul(self.penalty_unit);
            0
        } else {
            // Within capacity, next_size cannot overflow.
            match self.instance.catalog().next_size(weight) {
                Some(size) => size - weight,
                None => 0,
            }
        };
        if distinct_colors > MAX_COLORS_PER_SLAB {
            let excess = (distinct_colors - MAX_COLORS_PER_SLAB) as u64;
            penalty = penalty.saturating_add(excess.saturating_mul(self.penalty_unit));
        }
        (waste, penalty)
    }

    fn slab_cost(&self, label: usize) -> (u64, u64) {
        let agg = &self.slabs[label];
        self.cost_parts(agg.weight, agg.distinct_colors())
    }

    /// Adds `order` to slab `label`, updating aggregates and cost.
    pub fn add_order(&mut self, order: usize, label: usize) {
        let (old_waste, old_penalty) = self.slab_cost(label);
        let o = self.instance.order(order);
        let agg = &mut self.slabs[label];
        if agg.members.is_empty() {
            self.used += 1;
        }
        agg.weight += o.weight;
        agg.add_color(o.color);
        agg.members.push(order);
        self.assignment[order] = label;
        let (new_waste, new_penalty) = self.slab_cost(label);
        self.waste = self.waste - old_waste + new_waste;
        self.penalty = self.penalty - old_penalty + new_penalty;
    }

    /// Removes `order` from its slab, returning the label it was on.
    pub fn remove_order(&mut self, order: usize) -> usize {
        let label = self.assignment[order];
        let (old_waste, old_penalty) = self.slab_cost(label);
        let o = self.instance.order(order);
        let agg = &mut self.slabs[label];
        let pos = agg
            .members
            .iter()
            .position(|&m| m == order)
            .expect("assignment out of sync with slab members");
        agg.members.swap_remove(pos);
        agg.weight -= o.weight;
        agg.remove_color(o.color);
        if agg.members.is_empty() {
            self.used -= 1;
        }
        let (new_waste, new_penalty) = self.slab_cost(label);
        self.waste = self.waste - old_waste + new_waste;
        self.penalty = self.penalty - old_penalty + new_penalty;
        label
    }

    /// Moves `order` to slab `to`, returning its previous label.
    pub fn relocate(&mut self, order: usize, to: usize) -> usize {
        let from = self.remove_order(order);
        self.add_order(order, to);
        from
    }

    /// Returns an empty slab label, reusing one if available.
    pub fn open_slab(&mut self) -> usize {
        if let Some(label) = self.slabs.iter().position(|s| s.members.is_empty()) {
            label
        } else {
            self.slabs.push(SlabAgg::default());
            self.slabs.len() - 1
        }
    }

    /// Cost delta of removing `order` from its current slab.
    pub fn cost_of_removing(&self, order: usize) -> i64 {
        let label = self.assignment[order];
        let o = self.instance.order(order);
        let agg = &self.slabs[label];
        let (w0, p0) = self.cost_parts(agg.weight, agg.distinct_colors());
        let (w1, p1) =
            self.cost_parts(agg.weight - o.weight, agg.distinct_colors_without(o.color));
        ((w1 as i128 + p1 as i128) - (w0 as i128 + p0 as i128)) as i64
    }

    /// Cost delta of adding `order` to slab `label`.
    pub fn cost_of_adding(&self, order: usize, label: usize) -> i64 {
        let o = self.instance.order(order);
        let agg = &self.slabs[label];
        let (w0, p0) = self.cost_parts(agg.weight, agg.distinct_colors());
        let (w1, p1) = self.cost_parts(
            agg.weight + o.weight,
            agg.distinct_colors_with(o.color),
        );
        ((w1 as i128 + p1 as i128) - (w0 as i128 + p0 as i128)) as i64
    }

    /// The penalized annealing cost: waste plus violation penalties.
    pub fn penalized_cost(&self) -> u64 {
        self.waste.saturating_add(self.penalty)
    }

    /// Total sawtooth waste over within-capacity slabs. Equals the true
    /// objective exactly when the state is feasible.
    pub fn waste(&self) -> u64 {
        self.waste
    }

    /// True iff no slab violates capacity or the color limit.
    pub fn is_feasible(&self) -> bool {
        self.penalty == 0
    }

    /// Number of non-empty slabs.
    pub fn used_slab_count(&self) -> usize {
        self.used
    }

    /// Number of slab labels, including empty ones awaiting reuse.
    pub fn label_count(&self) -> usize {
        self.slabs.len()
    }

    /// The slab label `order` currently sits on.
    pub fn order_label(&self, order: usize) -> usize {
        self.assignment[order]
    }

    pub fn order_count(&self) -> usize {
        self.assignment.len()
    }

    pub fn slab_weight(&self, label: usize) -> u64 {
        self.slabs[label].weight
    }

    pub fn slab_members(&self, label: usize) -> &[usize] {
        &self.slabs[label].members
    }

    pub fn slab_distinct_colors(&self, label: usize) -> usize {
        self.slabs[label].distinct_colors()
    }

    /// The distinct colors currently on a slab.
    pub fn slab_colors(&self, label: usize) -> SmallVec<[u32; 4]> {
        self.slabs[label].colors.iter().map(|&(c, _)| c).collect()
    }

    /// Labels of all non-empty slabs.
    pub fn active_labels(&self) -> impl Iterator<Item = usize> + '_ {
        self.slabs
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.members.is_empty())
            .map(|(label, _)| label)
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Immutable snapshot of the current partition.
    ///
    /// Only meaningful as a result when the state is feasible; the engine
    /// snapshots exclusively at feasible points.
    pub fn snapshot(&self) -> Solution {
        let slabs = self
            .slabs
            .iter()
            .filter(|s| !s.members.is_empty())
            .map(|s| s.members.clone())
            .collect();
        Solution::new(slabs, self.waste)
    }

    /// Recomputes every aggregate from scratch and compares against the
    /// incrementally maintained values. Used by tests and debug builds to
    /// guarantee the no-drift invariant.
    pub fn check_consistency(&self) -> Result<(), String> {
        let n = self.instance.order_count();
        if self.assignment.len() != n {
            return Err(format!(
                "assignment covers {} orders, instance has {n}",
                self.assignment.len()
            ));
        }
        let mut weights = vec![0u64; self.slabs.len()];
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); self.slabs.len()];
        for (order, &label) in self.assignment.iter().enumerate() {
            if label >= self.slabs.len() {
                return Err(format!("order {order} assigned to unknown label {label}"));
            }
            weights[label] += self.instance.order(order).weight;
            members[label].push(order);
        }
        let mut waste = 0u64;
        let mut penalty = 0u64;
        let mut used = 0usize;
        for (label, agg) in self.slabs.iter().enumerate() {
            if agg.weight != weights[label] {
                return Err(format!(
                    "slab {label}: tracked weight {} != recomputed {}",
                    agg.weight, weights[label]
                ));
            }
            let mut tracked: Vec<usize> = agg.members.clone();
            tracked.sort_unstable();
            members[label].sort_unstable();
            if tracked != members[label] {
                return Err(format!("slab {label}: member list out of sync"));
            }
            let mut recomputed: Vec<(u32, u32)> = Vec::new();
            for &m in &members[label] {
                let color = self.instance.order(m).color;
                match recomputed.iter_mut().find(|(c, _)| *c == color) {
                    Some(entry) => entry.1 += 1,
                    None => recomputed.push((color, 1)),
                }
            }
            let mut tracked_colors: Vec<(u32, u32)> = agg.colors.to_vec();
            tracked_colors.sort_unstable();
            recomputed.sort_unstable();
            if tracked_colors != recomputed {
                return Err(format!("slab {label}: color multiset out of sync"));
            }
            if !agg.members.is_empty() {
                used += 1;
            }
            let (w, p) = self.cost_parts(agg.weight, agg.distinct_colors());
            waste += w;
            penalty = penalty.saturating_add(p);
        }
        if used != self.used {
            return Err(format!(
                "tracked used count {} != recomputed {used}",
                self.used
            ));
        }
        if waste != self.waste {
            return Err(format!(
                "tracked waste {} != recomputed {waste}",
                self.waste
            ));
        }
        if penalty != self.penalty {
            return Err(format!(
                "tracked penalty {} != recomputed {penalty}",
                self.penalty
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance::new(vec![10, 20], 3, vec![(6, 1), (6, 1), (15, 2), (3, 0)]).unwrap()
    }

    #[test]
    fn test_from_assignment_aggregates() {
        let instance = instance();
        // {0,1} on slab 0, {2} on slab 1, {3} on slab 2
        let state = PartitionState::from_assignment(&instance, &[0, 0, 1, 2]);
        assert_eq!(state.slab_weight(0), 12);
        assert_eq!(state.slab_weight(1), 15);
        assert_eq!(state.slab_weight(2), 3);
        assert_eq!(state.slab_distinct_colors(0), 1);
        assert_eq!(state.used_slab_count(), 3);
        // waste: 12 -> 20 (8), 15 -> 20 (5), 3 -> 10 (7)
        assert_eq!(state.waste(), 20);
        assert!(state.is_feasible());
        state.check_consistency().unwrap();
    }

    #[test]
    fn test_relocate_updates_cost() {
        let instance = instance();
        let mut state = PartitionState::from_assignment(&instance, &[0, 0, 1, 2]);
        // move order 3 (weight 3, color 0) onto slab 1 (weight 15, color 2)
        let from = state.relocate(3, 1);
        assert_eq!(from, 2);
        assert_eq!(state.slab_weight(1), 18);
        assert_eq!(state.slab_distinct_colors(1), 2);
        assert_eq!(state.used_slab_count(), 2);
        // waste: 12 -> 8, 18 -> 2
        assert_eq!(state.waste(), 10);
        assert!(state.is_feasible());
        state.check_consistency().unwrap();
    }

    #[test]
    fn test_delta_queries_match_mutation() {
        let instance = instance();
        let mut state = PartitionState::from_assignment(&instance, &[0, 0, 1, 2]);
        let before = state.penalized_cost() as i64;
        let delta = state.cost_of_removing(3) + state.cost_of_adding(3, 1);
        state.relocate(3, 1);
        let after = state.penalized_cost() as i64;
        assert_eq!(after - before, delta);
    }

    #[test]
    fn test_capacity_penalty() {
        let instance = instance();
        // everything on one slab: weight 30 > max 20, colors {1,2,0}
        let state = PartitionState::from_assignment(&instance, &[0, 0, 0, 0]);
        assert!(!state.is_feasible());
        // 10 units over capacity plus 1 excess color
        let unit = instance.total_weight()
            + instance.catalog().max_size() * instance.order_count() as u64
            + 1;
        assert_eq!(state.penalized_cost(), 10 * unit + unit);
        state.check_consistency().unwrap();
    }

    #[test]
    fn test_penalty_dominates_waste() {
        let instance = instance();
        let unit = instance.total_weight()
            + instance.catalog().max_size() * instance.order_count() as u64
            + 1;
        // every partition wastes at most max_size per used slab, so no
        // waste improvement can offset one unit of violation
        assert!(unit > instance.catalog().max_size() * instance.order_count() as u64);
    }

    #[test]
    fn test_empty_label_reuse() {
        let instance = instance();
        let mut state = PartitionState::from_assignment(&instance, &[0, 0, 1, 2]);
        state.relocate(3, 1); // slab 2 now empty
        assert_eq!(state.open_slab(), 2);
        state.relocate(3, 2);
        assert_eq!(state.order_label(3), 2);
        assert_eq!(state.used_slab_count(), 3);
        state.check_consistency().unwrap();
    }

    #[test]
    fn test_open_slab_grows_when_all_full() {
        let instance = instance();
        let mut state = PartitionState::from_assignment(&instance, &[0, 0, 1, 2]);
        let fresh = state.open_slab();
        assert_eq!(fresh, 3);
        assert_eq!(state.label_count(), 4);
    }

    #[test]
    fn test_undo_by_inverse_relocate() {
        let instance = instance();
        let mut state = PartitionState::from_assignment(&instance, &[0, 0, 1, 2]);
        let cost = state.penalized_cost();
        let from = state.relocate(1, 1);
        state.relocate(1, from);
        assert_eq!(state.penalized_cost(), cost);
        state.check_consistency().unwrap();
    }

    #[test]
    fn test_snapshot_matches_state() {
        let instance = instance();
        let state = PartitionState::from_assignment(&instance, &[0, 0, 1, 2]);
        let solution = state.snapshot();
        assert_eq!(solution.slab_count(), 3);
        assert_eq!(solution.total_waste(), 20);
        assert_eq!(solution.slabs()[0], vec![0, 1]);
    }
}
