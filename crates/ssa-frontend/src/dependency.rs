//! Minimum-dependency analysis: the set of entities transitively
//! reachable from the entry point. The driver skips
//! every file-scope entity outside this set.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use ssa_ir::EntityId;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<EntityId, Vec<EntityId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    pub fn add_dependency(&mut self, from: EntityId, to: EntityId) {
        self.edges.entry(from).or_default().push(to);
    }

    /// Entities reachable from `entry`, entry included.
    pub fn minimum_dependency_set(&self, entry: EntityId) -> BTreeSet<EntityId> {
        let mut seen = BTreeSet::new();
        let mut stack = alloc::vec![entry];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(deps) = self.edges.get(&id) {
                for d in deps {
                    if !seen.contains(d) {
                        stack.push(*d);
                    }
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_set_follows_transitive_edges() {
        let mut g = DependencyGraph::new();
        let main = EntityId::new(0);
        let helper = EntityId::new(1);
        let unused = EntityId::new(2);
        g.add_dependency(main, helper);
        let reachable = g.minimum_dependency_set(main);
        assert!(reachable.contains(&main));
        assert!(reachable.contains(&helper));
        assert!(!reachable.contains(&unused));
    }
}
