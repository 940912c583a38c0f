use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::Add;

/// Identifier of a node (an item number, a row id, ...)
pub trait NodeKey: Clone + Eq + Hash + Display + Debug {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Display + Debug {}

/// Value that can be accumulated up the tree.
///
/// `Default` must be the additive identity (`0.0` for floats).
pub trait Cost: Copy + Add<Output = Self> + Default + Debug {}

impl<T> Cost for T where T: Copy + Add<Output = T> + Default + Debug {}

/// One row of a bill of materials: an item, its owning parent and its own cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostNode<K = i64, C = f64> {
    /// Unique node id
    pub id: K,

    /// Owning parent, `None` for a root
    pub parent_id: Option<K>,

    /// Node cost (own cost before rollup, subtree total after)
    pub cost: C,
}

impl<K, C> CostNode<K, C> {
    pub fn new(id: K, parent_id: Option<K>, cost: C) -> Self {
        Self {
            id,
            parent_id,
            cost,
        }
    }

    pub fn root(id: K, cost: C) -> Self {
        Self::new(id, None, cost)
    }

    pub fn child(id: K, parent_id: K, cost: C) -> Self {
        Self::new(id, Some(parent_id), cost)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Planned transfer of a child's accumulated cost into its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupStep<K> {
    pub child: K,
    pub parent: K,

    /// Depth of `child` (roots sit at depth 0)
    pub depth: usize,
}

/// A transfer that was actually applied, with the amount moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution<K, C> {
    pub child: K,
    pub parent: K,
    pub depth: usize,
    pub amount: C,
}

/// Rolled-up node set together with the ordered transfers that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupOutcome<K, C> {
    pub nodes: Vec<CostNode<K, C>>,
    pub contributions: Vec<Contribution<K, C>>,
}
