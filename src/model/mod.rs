//! Problem data model.
//!
//! Everything here is immutable for the duration of a run: the [`Catalog`]
//! of producible slab sizes, the [`Order`] book, and the validated
//! [`Instance`] that ties them together. [`Solution`] is the immutable
//! snapshot handed back to callers once the search finishes.
//!
//! Instances are validated at construction; the search layers assume a
//! well-formed instance and never re-check it.

mod catalog;
mod instance;
mod order;
mod solution;

pub use catalog::Catalog;
pub use instance::{Instance, InstanceError, MAX_COLORS_PER_SLAB};
pub use order::Order;
pub use solution::Solution;
