use crate::config::RollupConfig;
use crate::error::{Result, TableError};
use crate::table::Table;
use bom_graph::{aggregate_traced, Contribution, CostNode};
use serde_json::{Number, Value};

/// Cell offsets of the node fields inside one table
#[derive(Debug, Clone)]
pub struct NodeColumns {
    id: (String, usize),
    parent: (String, usize),
    cost: (String, usize),
    root_sentinel: i64,
    width: usize,
}

impl NodeColumns {
    /// Resolve the configured column names against `table`.
    pub fn resolve(table: &Table, config: &RollupConfig) -> Result<Self> {
        config.validate()?;

        let locate = |name: &str| -> Result<(String, usize)> {
            let offset = table
                .column_offset(name)
                .ok_or_else(|| TableError::unknown_column(name))?;
            Ok((name.to_string(), offset))
        };

        Ok(Self {
            id: locate(&config.id_column)?,
            parent: locate(&config.parent_column)?,
            cost: locate(&config.cost_column)?,
            root_sentinel: config.root_sentinel,
            width: table.columns().len(),
        })
    }

    /// Read one node per row, in row order.
    pub fn extract(&self, table: &Table) -> Result<Vec<CostNode>> {
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let id = integer_cell(cells, row, self.width, &self.id)?;
                if id == self.root_sentinel {
                    return Err(TableError::SentinelId {
                        row,
                        sentinel: self.root_sentinel,
                    });
                }

                let parent = integer_cell(cells, row, self.width, &self.parent)?;
                let parent_id = (parent != self.root_sentinel).then_some(parent);

                let cost = cell(cells, row, self.width, &self.cost)?
                    .as_f64()
                    .ok_or_else(|| {
                        TableError::invalid_cell(row, &self.cost.0, "expected a number")
                    })?;

                Ok(CostNode::new(id, parent_id, cost))
            })
            .collect()
    }

    /// Write node costs back into the cost column, matched by row position.
    ///
    /// Every cost is checked before the first cell changes.
    pub fn write_costs(&self, table: &mut Table, nodes: &[CostNode]) -> Result<()> {
        let (column, offset) = &self.cost;
        if nodes.len() != table.len() {
            return Err(TableError::invalid_cell(
                nodes.len().min(table.len()),
                column,
                format!("{} costs for {} rows", nodes.len(), table.len()),
            ));
        }

        let numbers = nodes
            .iter()
            .enumerate()
            .map(|(row, node)| {
                Number::from_f64(node.cost)
                    .ok_or_else(|| TableError::invalid_cell(row, column, "cost is not finite"))
            })
            .collect::<Result<Vec<_>>>()?;

        for (row, number) in numbers.into_iter().enumerate() {
            table
                .set_cell(row, *offset, Value::Number(number))
                .ok_or_else(|| TableError::invalid_cell(row, column, "row is missing"))?;
        }

        Ok(())
    }
}

fn cell<'a>(
    cells: &'a [Value],
    row: usize,
    width: usize,
    (_, offset): &(String, usize),
) -> Result<&'a Value> {
    cells.get(*offset).ok_or(TableError::RowArity {
        row,
        expected: width,
        found: cells.len(),
    })
}

fn integer_cell(
    cells: &[Value],
    row: usize,
    width: usize,
    column: &(String, usize),
) -> Result<i64> {
    let value = cell(cells, row, width, column)?;
    if let Some(int) = value.as_i64() {
        return Ok(int);
    }
    // whole floats such as 3.0 come out of float-typed columns
    match value.as_f64() {
        Some(float)
            if float.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&float) =>
        {
            Ok(float as i64)
        }
        _ => Err(TableError::invalid_cell(
            row,
            &column.0,
            format!("expected an integer, found {value}"),
        )),
    }
}

/// Roll the cost column of `table` up its parent links.
///
/// Nothing is written unless the whole rollup succeeds. Returns the transfers
/// in the order they were applied. A table without rows rolls up to nothing,
/// whatever its columns.
pub fn rollup_table(
    table: &mut Table,
    config: &RollupConfig,
) -> Result<Vec<Contribution<i64, f64>>> {
    if table.is_empty() {
        config.validate()?;
        log::debug!("No rows to roll up");
        return Ok(Vec::new());
    }

    let columns = NodeColumns::resolve(table, config)?;
    let nodes = columns.extract(table)?;
    let outcome = aggregate_traced(&nodes)?;
    columns.write_costs(table, &outcome.nodes)?;

    log::info!(
        "Rolled up {} rows ({} transfers)",
        outcome.nodes.len(),
        outcome.contributions.len()
    );

    Ok(outcome.contributions)
}
