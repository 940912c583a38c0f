use crate::error::{Result, TableError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Column-major names over row-major JSON cells.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from JSON row records.
    ///
    /// Columns appear in the order their keys are first seen. A record that
    /// lacks a column gets `null` there.
    pub fn from_records(records: &[Value]) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        for (row, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or(TableError::InvalidRecord { row })?;
            for key in object.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .filter_map(Value::as_object)
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Parse a JSON array of row records.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let records: Vec<Value> = serde_json::from_str(raw)?;
        Self::from_records(&records)
    }

    /// One JSON object per row, keys in column order.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(object)
            })
            .collect()
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowArity {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Offset of `name` within a row
    pub fn column_offset(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: Value) -> Option<Value> {
        self.rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(column))
            .map(|cell| std::mem::replace(cell, value))
    }

    /// Row tuples: the row index followed by every cell.
    ///
    /// Positions handed out by [`crate::ColumnIndex`] address these tuples
    /// directly.
    pub fn tuples(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        self.rows.iter().enumerate().map(|(index, cells)| {
            let mut tuple = Vec::with_capacity(cells.len() + 1);
            tuple.push(Value::from(index));
            tuple.extend(cells.iter().cloned());
            tuple
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_records_round_out_missing_cells() {
        let table = Table::from_records(&[
            json!({"ID": 0, "cost": 1.5}),
            json!({"ID": 1, "parent_ID": 0}),
        ])
        .unwrap();

        assert_eq!(table.columns(), &["ID", "cost", "parent_ID"]);
        assert_eq!(table.rows()[0], vec![json!(0), json!(1.5), Value::Null]);
        assert_eq!(table.rows()[1], vec![json!(1), Value::Null, json!(0)]);
    }

    #[test]
    fn test_to_records_uses_column_order() {
        let mut table = Table::new(["b", "a"]);
        table.push_row(vec![json!(1), json!("x")]).unwrap();

        let records = table.to_records();
        assert_eq!(records, vec![json!({"b": 1, "a": "x"})]);
        let keys: Vec<&String> = records[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        let err = Table::from_records(&[json!({"a": 1}), json!([1, 2])]).unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord { row: 1 }));
    }

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = Table::new(["a", "b"]);
        let err = table.push_row(vec![json!(1)]).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowArity {
                row: 0,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_tuples_lead_with_row_index() {
        let table = Table::from_json_str(r#"[{"a": 5, "b": 8}, {"a": 4, "b": 2}]"#).unwrap();
        let tuples: Vec<Vec<Value>> = table.tuples().collect();
        assert_eq!(tuples[1], vec![json!(1), json!(4), json!(2)]);
    }

    #[test]
    fn test_set_cell_returns_previous_value() {
        let mut table = Table::from_json_str(r#"[{"a": 5}]"#).unwrap();
        assert_eq!(table.set_cell(0, 0, json!(6)), Some(json!(5)));
        assert_eq!(table.cell(0, 0), Some(&json!(6)));
        assert_eq!(table.set_cell(3, 0, json!(1)), None);
    }
}
