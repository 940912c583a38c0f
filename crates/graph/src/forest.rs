use crate::error::{Result, RollupError};
use crate::types::{Contribution, Cost, CostNode, NodeKey};
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Validated parent-linked forest.
///
/// Graph node indices match input positions, and edges point from parent to
/// child. Building one checks every invariant the rollup relies on, so holding
/// a `CostForest` means the input had unique ids, no dangling parents and no
/// cycles.
#[derive(Debug, Clone)]
pub struct CostForest<K> {
    /// Parent -> child edges, weighted by node id
    pub(crate) graph: DiGraph<K, ()>,

    /// Node id -> NodeIndex mapping for fast lookup
    pub(crate) id_index: HashMap<K, NodeIndex>,

    /// Resolved parent per input position
    pub(crate) parents: Vec<Option<NodeIndex>>,

    /// Hops to the owning root per input position
    pub(crate) depths: Vec<usize>,

    /// Deepest nodes first, input order within one depth
    pub(crate) order: Vec<NodeIndex>,
}

impl<K: NodeKey> CostForest<K> {
    /// Validate `nodes` and index their parent links.
    ///
    /// Checks run in a fixed order: duplicate ids, then dangling parents, then
    /// cycles.
    pub fn build<C>(nodes: &[CostNode<K, C>]) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut id_index = HashMap::with_capacity(nodes.len());

        // Phase 1: one graph node per input row
        for node in nodes {
            let idx = graph.add_node(node.id.clone());
            if id_index.insert(node.id.clone(), idx).is_some() {
                return Err(RollupError::duplicate_id(&node.id));
            }
        }

        // Phase 2: resolve parent links
        let mut parents = Vec::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            let parent = match &node.parent_id {
                None => None,
                Some(parent_id) => {
                    let parent_idx = id_index
                        .get(parent_id)
                        .copied()
                        .ok_or_else(|| RollupError::dangling_parent(&node.id, parent_id))?;
                    graph.add_edge(parent_idx, NodeIndex::new(pos), ());
                    Some(parent_idx)
                }
            };
            parents.push(parent);
        }

        // Phase 3: depths, bounded by the node count
        let depths = compute_depths(&parents)
            .map_err(|pos| RollupError::cycle_detected(&nodes[pos].id))?;

        let mut order: Vec<NodeIndex> = graph.node_indices().collect();
        // sort_by_key is stable, so equal depths keep input order
        order.sort_by_key(|idx| Reverse(depths[idx.index()]));

        log::debug!(
            "Validated cost forest: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            id_index,
            parents,
            depths,
            order,
        })
    }

    /// Move every non-root cost into its parent, deepest nodes first.
    ///
    /// `nodes` must be the slice this forest was built from.
    pub(crate) fn accumulate<C: Cost>(
        &self,
        nodes: &mut [CostNode<K, C>],
        mut on_step: impl FnMut(Contribution<K, C>),
    ) {
        debug_assert_eq!(nodes.len(), self.parents.len());

        for &idx in &self.order {
            let Some(parent) = self.parents[idx.index()] else {
                continue;
            };

            let amount = nodes[idx.index()].cost;
            let target = &mut nodes[parent.index()];
            target.cost = target.cost + amount;

            let child = &nodes[idx.index()].id;
            let parent_id = &nodes[parent.index()].id;
            log::debug!("{child} -> {parent_id}: +{amount:?}");

            on_step(Contribution {
                child: child.clone(),
                parent: parent_id.clone(),
                depth: self.depths[idx.index()],
                amount,
            });
        }

        log::info!(
            "Rolled up {} nodes across {} roots (max depth {})",
            self.node_count(),
            self.root_count(),
            self.max_depth()
        );
    }
}

/// Depth of every position, or the position of a node on a cycle.
///
/// Walks are memoized, so a valid forest costs O(n). A walk that takes more
/// than `n` hops has entered a cycle, and the node it stands on is part of it.
fn compute_depths(parents: &[Option<NodeIndex>]) -> std::result::Result<Vec<usize>, usize> {
    let limit = parents.len();
    let mut depths: Vec<Option<usize>> = vec![None; limit];
    let mut path = Vec::new();

    for start in 0..limit {
        path.clear();
        let mut cursor = start;

        let mut depth = loop {
            if let Some(known) = depths[cursor] {
                break known;
            }
            match parents[cursor] {
                None => {
                    depths[cursor] = Some(0);
                    break 0;
                }
                Some(parent) => {
                    path.push(cursor);
                    if path.len() > limit {
                        return Err(cursor);
                    }
                    cursor = parent.index();
                }
            }
        };

        while let Some(pos) = path.pop() {
            depth += 1;
            depths[pos] = Some(depth);
        }
    }

    Ok(depths.into_iter().map(Option::unwrap_or_default).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parents(links: &[Option<usize>]) -> Vec<Option<NodeIndex>> {
        links.iter().map(|p| p.map(NodeIndex::new)).collect()
    }

    #[test]
    fn test_depths_follow_parent_chain() {
        // 0 <- 1 <- 3, 0 <- 2 <- 4
        let depths = compute_depths(&parents(&[None, Some(0), Some(0), Some(1), Some(2)]));
        assert_eq!(depths, Ok(vec![0, 1, 1, 2, 2]));
    }

    #[test]
    fn test_depths_independent_of_position() {
        // leaf first, root last
        let depths = compute_depths(&parents(&[Some(1), Some(2), None]));
        assert_eq!(depths, Ok(vec![2, 1, 0]));
    }

    #[test]
    fn test_depths_report_node_on_cycle() {
        // 0 -> 1 -> 2 -> 1
        let err = compute_depths(&parents(&[Some(1), Some(2), Some(1)])).unwrap_err();
        assert!(err == 1 || err == 2, "reported {err}, which is not on the cycle");
    }

    #[test]
    fn test_build_orders_deepest_first() {
        let nodes = vec![
            CostNode::root(10, 0.0),
            CostNode::child(11, 10, 0.0),
            CostNode::child(12, 11, 0.0),
            CostNode::child(13, 10, 0.0),
        ];
        let forest = CostForest::build(&nodes).unwrap();
        let order: Vec<usize> = forest.order.iter().map(|idx| idx.index()).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_build_rejects_duplicates_before_dangling() {
        let nodes = vec![
            CostNode::root(1, 0.0),
            CostNode::child(2, 99, 0.0),
            CostNode::root(1, 0.0),
        ];
        let err = CostForest::build(&nodes).unwrap_err();
        assert_eq!(err, RollupError::duplicate_id(1));
    }
}
