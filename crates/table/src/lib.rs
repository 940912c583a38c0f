//! # BOM Table
//!
//! Row tables and the adapters that feed them through a cost rollup.
//!
//! - [`Table`] holds named columns over JSON cells and converts to and from
//!   row records
//! - [`ColumnIndex`] resolves column names to row-tuple positions, so tuple
//!   walks survive columns being added or dropped upstream
//! - [`NodeColumns`] and [`rollup_table`] read `(id, parent, cost)` nodes out
//!   of a table and write rolled-up costs back
//!
//! ## Example
//!
//! ```rust
//! use bom_table::{rollup_table, RollupConfig, Table};
//!
//! let mut table = Table::from_json_str(
//!     r#"[{"ID": 0, "parent_ID": -1, "cost": 1.0}, {"ID": 1, "parent_ID": 0, "cost": 2.0}]"#,
//! ).unwrap();
//!
//! rollup_table(&mut table, &RollupConfig::default()).unwrap();
//! assert_eq!(table.to_records()[0]["cost"], 3.0);
//! ```

mod columns;
mod config;
mod error;
mod nodes;
mod table;

pub use columns::{retain_keys, ColumnIndex, ROW_INDEX_COLUMN};
pub use config::RollupConfig;
pub use error::{Result, TableError};
pub use nodes::{rollup_table, NodeColumns};
pub use table::Table;
