//! Greedy initial construction.

use crate::model::{Instance, MAX_COLORS_PER_SLAB};
use smallvec::SmallVec;

/// First-fit-decreasing construction: orders sorted by weight descending,
/// each placed on the feasible slab with the smallest waste increase, with
/// ties broken by lowest label. A new slab is opened when no existing one
/// can take the order within capacity and the two-color limit.
///
/// The result is a full order-to-label assignment. It is feasible whenever
/// every order fits alone in the largest catalog size; an order heavier
/// than that gets its own slab and the violation surfaces as penalty in
/// the partition state.
pub fn greedy_assignment(instance: &Instance) -> Vec<usize> {
    let n = instance.order_count();
    let catalog = instance.catalog();
    let max_size = catalog.max_size();

    let mut ids: Vec<usize> = (0..n).collect();
    // Heaviest first; equal weights keep id order for determinism.
    ids.sort_by_key(|&id| (std::cmp::Reverse(instance.order(id).weight), id));

    struct OpenSlab {
        weight: u64,
        colors: SmallVec<[u32; 2]>,
    }

    let mut slabs: Vec<OpenSlab> = Vec::new();
    let mut assignment = vec![0usize; n];

    for id in ids {
        let order = instance.order(id);
        let mut best: Option<(u64, usize)> = None;
        for (label, slab) in slabs.iter().enumerate() {
            let new_weight = slab.weight + order.weight;
            if new_weight > max_size {
                continue;
            }
            let new_colors = if slab.colors.contains(&order.color) {
                slab.colors.len()
            } else {
                slab.colors.len() + 1
            };
            if new_colors > MAX_COLORS_PER_SLAB {
                continue;
            }
            // Both weights are within capacity here, so the lookups succeed.
            let waste_before = catalog.next_size(slab.weight).map_or(0, |s| s - slab.weight);
            let waste_after = catalog.next_size(new_weight).map_or(0, |s| s - new_weight);
            let increase = waste_after.saturating_sub(waste_before);
            if best.is_none_or(|(best_increase, _)| increase < best_increase) {
                best = Some((increase, label));
            }
        }
        let label = match best {
            Some((_, label)) => label,
            None => {
                slabs.push(OpenSlab {
                    weight: 0,
                    colors: SmallVec::new(),
                });
                slabs.len() - 1
            }
        };
        let slab = &mut slabs[label];
        slab.weight += order.weight;
        if !slab.colors.contains(&order.color) {
            slab.colors.push(order.color);
        }
        assignment[id] = label;
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PartitionState;

    #[test]
    fn test_construction_is_feasible() {
        let instance =
            Instance::new(vec![10, 20], 3, vec![(6, 1), (6, 1), (15, 2), (3, 0)]).unwrap();
        let assignment = greedy_assignment(&instance);
        let state = PartitionState::from_assignment(&instance, &assignment);
        assert!(state.is_feasible());
        state.check_consistency().unwrap();
    }

    #[test]
    fn test_single_order() {
        let instance = Instance::new(vec![7], 1, vec![(5, 0)]).unwrap();
        let assignment = greedy_assignment(&instance);
        assert_eq!(assignment, vec![0]);
        let state = PartitionState::from_assignment(&instance, &assignment);
        assert_eq!(state.waste(), 2);
    }

    #[test]
    fn test_zero_waste_pairing() {
        // two weight-10 orders of one color fill a size-20 slab exactly
        let instance = Instance::new(vec![10, 20], 1, vec![(10, 0), (10, 0)]).unwrap();
        let assignment = greedy_assignment(&instance);
        assert_eq!(assignment[0], assignment[1]);
        let state = PartitionState::from_assignment(&instance, &assignment);
        assert_eq!(state.waste(), 0);
        assert_eq!(state.used_slab_count(), 1);
    }

    #[test]
    fn test_color_limit_opens_new_slab() {
        // three tiny orders of three colors cannot share one slab
        let instance = Instance::new(vec![100], 3, vec![(1, 0), (1, 1), (1, 2)]).unwrap();
        let assignment = greedy_assignment(&instance);
        let state = PartitionState::from_assignment(&instance, &assignment);
        assert!(state.is_feasible());
        assert_eq!(state.used_slab_count(), 2);
    }

    #[test]
    fn test_overweight_order_gets_own_slab() {
        let instance = Instance::new(vec![10], 1, vec![(11, 0), (5, 0)]).unwrap();
        let assignment = greedy_assignment(&instance);
        assert_ne!(assignment[0], assignment[1]);
        let state = PartitionState::from_assignment(&instance, &assignment);
        assert!(!state.is_feasible());
    }

    #[test]
    fn test_empty_instance() {
        let instance = Instance::new(vec![10], 0, vec![]).unwrap();
        assert!(greedy_assignment(&instance).is_empty());
    }
}
