use crate::error::{Result, RollupError};
use crate::forest::CostForest;
use crate::types::{NodeKey, RollupStep};
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;
use petgraph::Direction;

impl<K: NodeKey> CostForest<K> {
    fn index_of(&self, id: &K) -> Result<NodeIndex> {
        self.id_index
            .get(id)
            .copied()
            .ok_or_else(|| RollupError::NodeNotFound(id.to_string()))
    }

    fn key(&self, idx: NodeIndex) -> &K {
        &self.graph[idx]
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    pub fn contains(&self, id: &K) -> bool {
        self.id_index.contains_key(id)
    }

    /// Root ids in input order
    pub fn roots(&self) -> Vec<&K> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .map(|(pos, _)| self.key(NodeIndex::new(pos)))
            .collect()
    }

    pub fn root_count(&self) -> usize {
        self.parents.iter().filter(|parent| parent.is_none()).count()
    }

    /// Ids of nodes without children, in input order
    pub fn leaves(&self) -> Vec<&K> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|idx| self.key(idx))
            .collect()
    }

    /// Direct children of `id`, in input order
    pub fn children(&self, id: &K) -> Result<Vec<&K>> {
        let idx = self.index_of(id)?;
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        children.sort_unstable();
        Ok(children.into_iter().map(|child| self.key(child)).collect())
    }

    pub fn parent(&self, id: &K) -> Result<Option<&K>> {
        let idx = self.index_of(id)?;
        Ok(self.parents[idx.index()].map(|parent| self.key(parent)))
    }

    /// Hops from `id` to its root (roots sit at depth 0)
    pub fn depth(&self, id: &K) -> Result<usize> {
        let idx = self.index_of(id)?;
        Ok(self.depths[idx.index()])
    }

    pub fn max_depth(&self) -> usize {
        self.depths.iter().copied().max().unwrap_or(0)
    }

    /// `id` followed by each ancestor, ending at its root
    pub fn path_to_root(&self, id: &K) -> Result<Vec<&K>> {
        let start = self.index_of(id)?;
        let mut path = Vec::with_capacity(self.depths[start.index()] + 1);
        let mut cursor = Some(start);

        while let Some(idx) = cursor {
            path.push(self.key(idx));
            cursor = self.parents[idx.index()];
        }

        Ok(path)
    }

    /// Every node below `id`, in depth-first order
    pub fn descendants(&self, id: &K) -> Result<Vec<&K>> {
        let start = self.index_of(id)?;
        let mut dfs = Dfs::new(&self.graph, start);
        let mut found = Vec::new();

        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                found.push(self.key(idx));
            }
        }

        Ok(found)
    }

    /// Transfers a rollup would apply, in application order
    pub fn plan(&self) -> Vec<RollupStep<K>> {
        self.order
            .iter()
            .filter_map(|&idx| {
                self.parents[idx.index()].map(|parent| RollupStep {
                    child: self.key(idx).clone(),
                    parent: self.key(parent).clone(),
                    depth: self.depths[idx.index()],
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::types::CostNode;
    use crate::{CostForest, RollupError};
    use pretty_assertions::assert_eq;

    fn sample() -> CostForest<i64> {
        // 0 ── 1 ── 3
        //  └── 2 ── 4
        // 7 (isolated root)
        let nodes = vec![
            CostNode::child(4, 2, 1.66),
            CostNode::root(0, 0.0),
            CostNode::child(3, 1, 0.5),
            CostNode::child(1, 0, 0.0),
            CostNode::root(7, 2.0),
            CostNode::child(2, 0, 0.0),
        ];
        CostForest::build(&nodes).unwrap()
    }

    #[test]
    fn test_roots_and_leaves() {
        let forest = sample();
        assert_eq!(forest.roots(), vec![&0, &7]);
        assert_eq!(forest.root_count(), 2);
        assert_eq!(forest.leaves(), vec![&4, &3, &7]);
    }

    #[test]
    fn test_children_in_input_order() {
        let forest = sample();
        assert_eq!(forest.children(&0).unwrap(), vec![&1, &2]);
        assert_eq!(forest.children(&3).unwrap(), Vec::<&i64>::new());
    }

    #[test]
    fn test_depth_and_path_to_root() {
        let forest = sample();
        assert_eq!(forest.depth(&4).unwrap(), 2);
        assert_eq!(forest.max_depth(), 2);
        assert_eq!(forest.path_to_root(&4).unwrap(), vec![&4, &2, &0]);
        assert_eq!(forest.path_to_root(&7).unwrap(), vec![&7]);
        assert_eq!(forest.parent(&1).unwrap(), Some(&0));
        assert_eq!(forest.parent(&0).unwrap(), None);
    }

    #[test]
    fn test_descendants() {
        let forest = sample();
        let mut below = forest.descendants(&0).unwrap();
        below.sort();
        assert_eq!(below, vec![&1, &2, &3, &4]);
        assert!(forest.descendants(&7).unwrap().is_empty());
    }

    #[test]
    fn test_plan_lists_deepest_transfers_first() {
        let forest = sample();
        let plan: Vec<(i64, i64, usize)> = forest
            .plan()
            .into_iter()
            .map(|step| (step.child, step.parent, step.depth))
            .collect();
        assert_eq!(plan, vec![(4, 2, 2), (3, 1, 2), (1, 0, 1), (2, 0, 1)]);
    }

    #[test]
    fn test_unknown_id_is_reported() {
        let forest = sample();
        assert_eq!(
            forest.depth(&42).unwrap_err(),
            RollupError::NodeNotFound("42".to_string())
        );
    }
}
