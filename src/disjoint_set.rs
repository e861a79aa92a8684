use anyhow::Result;

/// A disjoint-set node. `weight` is only meaningful while the node is a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    parent: usize,
    weight: usize,
}

/// Weighted quick-union with path compression.
///
/// Every index starts out as its own singleton component. `union` always hangs the
/// lighter tree under the heavier one, which bounds tree height by O(log n), and
/// `find` halves the path it walks so repeated lookups approach constant time.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    nodes: Vec<Node>,
}

impl DisjointSet {
    /// Creates `n` singleton components, each its own root with weight 1.
    pub fn new(n: usize) -> Self {
        DisjointSet {
            nodes: (0..n).map(|i| Node { parent: i, weight: 1 }).collect(),
        }
    }

    /// Like [`DisjointSet::new`], but reports an allocation failure instead of aborting.
    pub fn try_new(n: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(n)
            .map_err(|e| anyhow::anyhow!("Failed to allocate disjoint set of {} nodes: {}", n, e))?;
        nodes.extend((0..n).map(|i| Node { parent: i, weight: 1 }));
        Ok(DisjointSet { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the root of `i`'s component, advancing every visited node to its grandparent.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn find(&mut self, i: usize) -> usize {
        let mut current = i;
        while self.nodes[current].parent != current {
            let grandparent = self.nodes[self.nodes[current].parent].parent;
            self.nodes[current].parent = grandparent;
            current = grandparent;
        }
        current
    }

    /// Merges the components of `p` and `q`.
    ///
    /// Returns the root of the merged component, or `None` if `p` and `q` were already
    /// connected and nothing changed. On equal weights `q`'s root goes under `p`'s.
    pub fn union(&mut self, p: usize, q: usize) -> Option<usize> {
        let root_p = self.find(p);
        let root_q = self.find(q);
        if root_p == root_q {
            return None;
        }

        let (parent, child) = if self.nodes[root_q].weight > self.nodes[root_p].weight {
            (root_q, root_p)
        } else {
            (root_p, root_q)
        };
        self.nodes[child].parent = parent;
        self.nodes[parent].weight += self.nodes[child].weight;
        Some(parent)
    }

    /// Read-only root lookup; walks the path without compressing it.
    pub fn root(&self, i: usize) -> usize {
        let mut current = i;
        while self.nodes[current].parent != current {
            current = self.nodes[current].parent;
        }
        current
    }

    pub fn connected(&mut self, p: usize, q: usize) -> bool {
        self.find(p) == self.find(q)
    }

    /// Size of the component containing `i`.
    pub fn weight(&mut self, i: usize) -> usize {
        let root = self.find(i);
        self.nodes[root].weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_singletons() {
        let mut set = DisjointSet::new(4);
        for i in 0..4 {
            assert_eq!(set.find(i), i);
            assert_eq!(set.weight(i), 1);
        }
        assert!(!set.connected(0, 1));
    }

    #[test]
    fn empty_set_is_allowed() {
        let set = DisjointSet::new(0);
        assert!(set.is_empty());
        assert_eq!(DisjointSet::try_new(0).unwrap().len(), 0);
    }

    #[test]
    fn tie_attaches_q_under_p() {
        let mut set = DisjointSet::new(2);
        assert_eq!(set.union(0, 1), Some(0));
        assert_eq!(set.find(1), 0);
    }

    #[test]
    fn lighter_tree_goes_under_heavier() {
        let mut set = DisjointSet::new(5);
        set.union(1, 2);
        set.union(1, 3);
        // {1,2,3} weighs 3, {0} weighs 1: the singleton is attached to 1 even though p = 0.
        assert_eq!(set.union(0, 1), Some(1));
        assert_eq!(set.find(0), 1);
        assert_eq!(set.weight(0), 4);
        assert_eq!(set.weight(4), 1);
    }

    #[test]
    fn union_is_idempotent() {
        let mut set = DisjointSet::new(3);
        assert!(set.union(0, 2).is_some());
        let before = set.clone();
        assert_eq!(set.union(0, 2), None);
        assert_eq!(set.union(2, 0), None);
        assert_eq!(set.nodes, before.nodes);
        assert!(set.connected(2, 0));
    }

    #[test]
    fn find_compresses_long_chains() {
        let mut set = DisjointSet::new(4);
        // Build the chain 3 -> 2 -> 1 -> 0 by hand to exercise compression.
        set.nodes[1].parent = 0;
        set.nodes[2].parent = 1;
        set.nodes[3].parent = 2;
        set.nodes[0].weight = 4;

        assert_eq!(set.find(3), 0);
        assert_eq!(set.nodes[3].parent, 1);
        assert_eq!(set.find(3), 0);
        assert_eq!(set.nodes[3].parent, 0);
    }

    #[test]
    #[should_panic]
    fn find_out_of_range_panics() {
        let mut set = DisjointSet::new(2);
        set.find(2);
    }
}
