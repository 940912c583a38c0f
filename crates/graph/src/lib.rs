//! # BOM Graph
//!
//! Bottom-up cost rollup over a forest of parent-linked nodes.
//!
//! ## Features
//!
//! - **Order-free rollup** - nodes may arrive in any order; processing order is
//!   derived from tree depth
//! - **Validate-then-apply** - duplicate ids, dangling parents and cycles are
//!   rejected before any cost moves
//! - **Multi-root forests** - every root collects its own subtree only
//! - **Traceable** - every transfer can be replayed as a [`Contribution`]
//!
//! ## Architecture
//!
//! ```text
//! CostNode[]
//!     │
//!     ├──> CostForest::build (petgraph)
//!     │      ├─ Index ids, reject duplicates
//!     │      ├─ Resolve parent links, reject dangling parents
//!     │      └─ Compute depths, reject cycles
//!     │
//!     └──> Rollup
//!            ├─ Visit nodes deepest first (stable within a depth)
//!            └─ Add each node's running total into its parent
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bom_graph::{aggregate, CostNode};
//!
//! let bom = vec![
//!     CostNode::child(3, 1, 0.50),
//!     CostNode::root(0, 0.00),
//!     CostNode::child(1, 0, 0.00),
//! ];
//!
//! let rolled = aggregate(&bom).unwrap();
//! assert_eq!(rolled[1].cost, 0.50);
//! ```

mod error;
mod forest;
mod graph;
mod rollup;
mod types;

pub use error::{Result, RollupError};
pub use forest::CostForest;
pub use rollup::{aggregate, aggregate_in_place, aggregate_traced, plan};
pub use types::{Contribution, Cost, CostNode, NodeKey, RollupOutcome, RollupStep};
