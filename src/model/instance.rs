//! The validated problem instance.

use super::catalog::Catalog;
use super::order::Order;
use thiserror::Error;

/// Maximum number of distinct colors allowed on one slab.
///
/// Fixed by the problem definition, not configurable per instance.
pub const MAX_COLORS_PER_SLAB: usize = 2;

/// Validation errors for a raw instance.
///
/// All of these indicate malformed input from the parsing layer and are
/// surfaced to the caller before any search starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("catalog contains no sizes")]
    EmptyCatalog,

    #[error("catalog size at position {position} is zero")]
    ZeroSize { position: usize },

    #[error("catalog sizes must be strictly ascending: {prev} followed by {next} at position {position}")]
    UnsortedCatalog {
        position: usize,
        prev: u64,
        next: u64,
    },

    #[error("order {id} has zero weight")]
    ZeroWeight { id: usize },

    #[error("order {id} has color {color}, but the instance declares only {color_count} colors")]
    ColorOutOfRange {
        id: usize,
        color: u32,
        color_count: u32,
    },

    #[error("declared color count is zero but orders are present")]
    ZeroColorCount,
}

/// An immutable steel mill slab design instance: the size catalog, the
/// order book, and the declared number of colors.
///
/// Built from the raw shape the parsing layer produces (ascending sizes,
/// a color count, and `(weight, color)` pairs indexed 0..n-1) and fully
/// validated at construction. Read-only afterwards, so it can be shared
/// across search replicas without synchronization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    catalog: Catalog,
    orders: Vec<Order>,
    color_count: u32,
    total_weight: u64,
}

impl Instance {
    /// Validates and builds an instance from raw parts.
    pub fn new(
        sizes: Vec<u64>,
        color_count: u32,
        orders: Vec<(u64, u32)>,
    ) -> Result<Self, InstanceError> {
        let catalog = Catalog::new(sizes)?;
        if color_count == 0 && !orders.is_empty() {
            return Err(InstanceError::ZeroColorCount);
        }
        let mut total_weight = 0u64;
        let orders = orders
            .into_iter()
            .enumerate()
            .map(|(id, (weight, color))| {
                if weight == 0 {
                    return Err(InstanceError::ZeroWeight { id });
                }
                if color >= color_count {
                    return Err(InstanceError::ColorOutOfRange {
                        id,
                        color,
                        color_count,
                    });
                }
                total_weight += weight;
                Ok(Order::new(id, weight, color))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog,
            orders,
            color_count,
            total_weight,
        })
    }

    /// The size catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All orders, indexed by id.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The order with the given id.
    ///
    /// # Panics
    /// Panics if `id >= order_count()`.
    pub fn order(&self, id: usize) -> Order {
        self.orders[id]
    }

    /// Number of orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Declared number of distinct colors.
    pub fn color_count(&self) -> u32 {
        self.color_count
    }

    /// Sum of all order weights. Used to scale infeasibility penalties.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }
}
