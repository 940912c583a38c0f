use crate::error::{Result, TableError};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the leading tuple slot that holds the row index
pub const ROW_INDEX_COLUMN: &str = "Index";

/// Column name -> tuple position mapping.
///
/// Positions are resolved by name every time a table is loaded, so code that
/// walks [`Table::tuples`] keeps working when the source gains, loses or
/// reorders columns. Position 0 is the row index; columns follow from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIndex {
    entries: Vec<(String, usize)>,
}

impl ColumnIndex {
    /// Index every column of `table`, led by [`ROW_INDEX_COLUMN`].
    pub fn for_table(table: &Table) -> Self {
        let entries = std::iter::once(ROW_INDEX_COLUMN.to_string())
            .chain(table.columns().iter().cloned())
            .enumerate()
            .map(|(position, name)| (name, position))
            .collect();
        Self { entries }
    }

    /// Tuple position of a single column
    pub fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, position)| *position)
            .ok_or_else(|| TableError::unknown_column(name))
    }

    /// Keep only the named columns, in table order.
    ///
    /// Every name must exist, and at least one must be given.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        if names.is_empty() {
            return Err(TableError::NoColumnsSelected);
        }
        if let Some(missing) = names
            .iter()
            .find(|name| !self.entries.iter().any(|(column, _)| column == *name))
        {
            return Err(TableError::unknown_column(*missing));
        }

        let entries = self
            .entries
            .iter()
            .filter(|(column, _)| names.contains(&column.as_str()))
            .cloned()
            .collect();
        Ok(Self { entries })
    }

    /// Column names in table order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|(name, position)| (name.as_str(), *position))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drop every key of `map` that is not listed in `keys`.
///
/// Fails with [`TableError::NoColumnsSelected`] when nothing survives.
pub fn retain_keys(map: &mut Map<String, Value>, keys: &[&str]) -> Result<()> {
    map.retain(|key, _| keys.contains(&key.as_str()));
    if map.is_empty() {
        return Err(TableError::NoColumnsSelected);
    }
    Ok(())
}
