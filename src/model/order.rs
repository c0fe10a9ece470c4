//! A single production order.

/// A unit of demand: a required weight of steel in a single color.
///
/// Orders are immutable once the instance is built. Identity is the `id`,
/// which equals the order's index in the instance (0..n-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Stable index of this order within the instance.
    pub id: usize,

    /// Required weight. Always positive in a valid instance.
    pub weight: u64,

    /// Color code. Always below the instance's declared color count.
    pub color: u32,
}

impl Order {
    /// Creates a new order.
    pub fn new(id: usize, weight: u64, color: u32) -> Self {
        Self { id, weight, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_fields() {
        let order = Order::new(3, 42, 7);
        assert_eq!(order.id, 3);
        assert_eq!(order.weight, 42);
        assert_eq!(order.color, 7);
    }
}
