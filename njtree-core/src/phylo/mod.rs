pub mod distance;
pub mod engine;
pub mod newick;
pub mod tree;

pub use distance::DistanceMatrix;
pub use engine::{build_newick, cluster, neighbor_joining, NodeId, Relation, RelationMap};
pub use newick::to_newick;
pub use tree::{build_tree, Tree, TreeNode};
