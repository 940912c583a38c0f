use crate::error::Result;
use crate::forest::CostForest;
use crate::types::{Cost, CostNode, NodeKey, RollupOutcome, RollupStep};

/// Roll every node's cost up into its ancestors.
///
/// Returns the nodes in input order. Roots end up holding the total of their
/// whole tree, inner nodes the total of their subtree, and leaves keep their
/// own cost. Input order does not matter: nodes are processed deepest first,
/// with ties broken by input position.
///
/// This is single-shot. Feeding the output back in rolls the subtotals up a
/// second time.
pub fn aggregate<K: NodeKey, C: Cost>(nodes: &[CostNode<K, C>]) -> Result<Vec<CostNode<K, C>>> {
    let mut rolled = nodes.to_vec();
    aggregate_in_place(&mut rolled)?;
    Ok(rolled)
}

/// Same as [`aggregate`], updating `nodes` directly.
///
/// On error `nodes` is left untouched.
pub fn aggregate_in_place<K: NodeKey, C: Cost>(nodes: &mut [CostNode<K, C>]) -> Result<()> {
    let forest = CostForest::build(nodes)?;
    forest.accumulate(nodes, |_| {});
    Ok(())
}

/// [`aggregate`], also returning each transfer in the order it was applied.
pub fn aggregate_traced<K: NodeKey, C: Cost>(
    nodes: &[CostNode<K, C>],
) -> Result<RollupOutcome<K, C>> {
    let mut rolled = nodes.to_vec();
    let forest = CostForest::build(&rolled)?;

    let mut contributions = Vec::with_capacity(rolled.len());
    forest.accumulate(&mut rolled, |step| contributions.push(step));

    Ok(RollupOutcome {
        nodes: rolled,
        contributions,
    })
}

/// Validate `nodes` and list the transfers [`aggregate`] would apply.
pub fn plan<K: NodeKey, C>(nodes: &[CostNode<K, C>]) -> Result<Vec<RollupStep<K>>> {
    Ok(CostForest::build(nodes)?.plan())
}
