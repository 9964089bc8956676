use super::engine::{NodeId, RelationMap};

/// Arena node: an identifier plus attached children with the branch length
/// to each. A node without children is a leaf (an original taxon).
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    pub children: Vec<(usize, f64)>,
}

/// Tree of owned nodes addressed by arena index; node 0 is the root.
/// Ownership runs strictly parent to child, no back-pointers.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn root(&self) -> usize {
        0
    }

    pub fn node(&self, idx: usize) -> &TreeNode {
        &self.nodes[idx]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.children.is_empty()).count()
    }

    pub fn leaves(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.children.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}

/// Materializes the tree breadth-first from the root, consuming each
/// relation exactly once. The finished tree holds `relations.len() + 1`
/// nodes.
pub fn build_tree(root: NodeId, mut relations: RelationMap) -> Tree {
    let total = relations.len();
    let mut nodes = vec![TreeNode {
        id: root,
        children: Vec::new(),
    }];
    let mut frontier = vec![0usize];

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for parent_idx in frontier {
            let child_ids: Vec<NodeId> = relations
                .iter()
                .filter(|entry| entry.1.parent == nodes[parent_idx].id)
                .map(|entry| entry.0.clone())
                .collect();
            for child_id in child_ids {
                if let Some(rel) = relations.remove(&child_id) {
                    let child_idx = nodes.len();
                    nodes.push(TreeNode {
                        id: child_id,
                        children: Vec::new(),
                    });
                    nodes[parent_idx].children.push((child_idx, rel.distance));
                    next.push(child_idx);
                }
            }
        }
        frontier = next;
    }

    debug_assert_eq!(nodes.len(), total + 1);
    Tree { nodes }
}
