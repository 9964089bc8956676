use vector_map::VecMap;

use super::distance::DistanceMatrix;
use super::newick::to_newick;
use super::tree::{build_tree, Tree};

/// Identifier of a taxon or cluster.
///
/// Composite identifiers are formed by concatenating the two merged
/// identifiers (first slot's id, then second's), so every cluster created
/// during a run has a distinct name as long as the input labels are
/// distinct, which [`DistanceMatrix::new`] enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeId(Box<str>);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn merged(&self, other: &NodeId) -> NodeId {
        let mut id = String::with_capacity(self.0.len() + other.0.len());
        id.push_str(&self.0);
        id.push_str(&other.0);
        NodeId(id.into_boxed_str())
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.into())
    }
}

/// Parent link recorded when an identifier is absorbed into a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub parent: NodeId,
    pub distance: f64,
}

/// Child identifier -> parent relation, in insertion order. Iteration order
/// matters: it fixes the order in which the tree builder attaches children,
/// keeping the serialized output reproducible.
pub type RelationMap = VecMap<NodeId, Relation>;

/// Runs the neighbor-joining loop to completion, returning the root
/// identifier and the full relation map.
///
/// Every identifier other than the root ends up with exactly one relation:
/// `2n - 3` of them for `n >= 3`, one for `n == 2`, none for `n == 1`.
pub fn cluster(mut dist: DistanceMatrix) -> (NodeId, RelationMap) {
    let n = dist.n();
    let mut relations: RelationMap = VecMap::new();
    let mut ids: Vec<NodeId> = dist
        .labels()
        .iter()
        .map(|label| NodeId::from(&**label))
        .collect();

    if n == 1 {
        return (ids[0].clone(), relations);
    }
    if n == 2 {
        let distance = dist.get(0, 1);
        relations.insert(
            ids[0].clone(),
            Relation {
                parent: ids[1].clone(),
                distance,
            },
        );
        return (ids[1].clone(), relations);
    }

    while dist.active_count() > 3 {
        let (i, j) = closest_pair(&dist);
        let (edge_i, edge_j) = pair_edges(&dist, i, j);

        let merged = ids[i].merged(&ids[j]);
        relations.insert(
            ids[i].clone(),
            Relation {
                parent: merged.clone(),
                distance: edge_i,
            },
        );
        relations.insert(
            ids[j].clone(),
            Relation {
                parent: merged.clone(),
                distance: edge_j,
            },
        );
        ids[i] = merged;

        reduce(&mut dist, i, j);
    }

    let root = resolve_trifurcation(&dist, &ids, &mut relations);
    (root, relations)
}

/// Neighbor-joining on an exclusively owned matrix, producing the finished
/// tree.
pub fn neighbor_joining(dist: DistanceMatrix) -> Tree {
    let (root, relations) = cluster(dist);
    build_tree(root, relations)
}

/// Runs neighbor-joining and serializes the result in one step.
pub fn build_newick(dist: DistanceMatrix) -> String {
    let labels = dist.labels().to_vec();
    let tree = neighbor_joining(dist);
    to_newick(&labels, &tree)
}

/// Finds the active pair `(i, j)`, `i < j`, minimizing the Q-criterion
/// `(c - 2) * d(i, j) - rowSum(i) - rowSum(j)` where `c` is the active
/// count.
///
/// Ties resolve to the first pair encountered in increasing `(i, j)` order.
/// Requires at least two active taxa; the engine only calls this with four
/// or more.
pub(crate) fn closest_pair(dist: &DistanceMatrix) -> (usize, usize) {
    let c = dist.active_count() as f64;
    let active: Vec<usize> = dist.active_indices().collect();

    let mut min_q = f64::INFINITY;
    let mut best = (0, 0);
    for (ai, &i) in active.iter().enumerate() {
        for &j in &active[(ai + 1)..] {
            let q = (c - 2.0) * dist.get(i, j) - dist.row_sum(i) - dist.row_sum(j);
            if q < min_q {
                min_q = q;
                best = (i, j);
            }
        }
    }
    best
}

/// Branch lengths from the chosen pair to their new parent, by the additive
/// tree formula. The active count must still include `j`.
pub(crate) fn pair_edges(dist: &DistanceMatrix, i: usize, j: usize) -> (f64, f64) {
    let c = dist.active_count() as f64;
    let d_ij = dist.get(i, j);
    let r_i = dist.row_sum(i) / (c - 2.0);
    let r_j = dist.row_sum(j) / (c - 2.0);
    let edge_i = 0.5 * (d_ij + r_i - r_j);
    (edge_i, d_ij - edge_i)
}

/// Merges pair `(i, j)` into slot `i` and demotes `j`.
///
/// Row-sum adjustments use the distances captured before the cell is
/// overwritten; subtracting the already-updated value would corrupt every
/// later pair selection.
pub(crate) fn reduce(dist: &mut DistanceMatrix, i: usize, j: usize) {
    let d_ij = dist.get(i, j);
    let others: Vec<usize> = dist
        .active_indices()
        .filter(|&k| k != i && k != j)
        .collect();

    let mut merged_row_sum = 0.0;
    for k in others {
        let old_ik = dist.get(i, k);
        let old_jk = dist.get(j, k);
        let new_dist = 0.5 * (old_ik + old_jk - d_ij);
        dist.set(i, k, new_dist);
        merged_row_sum += new_dist;
        dist.set_row_sum(k, dist.row_sum(k) + new_dist - old_ik - old_jk);
    }
    dist.set_row_sum(i, merged_row_sum);
    dist.deactivate(j);
}

/// Resolves the final three active taxa directly from their pairwise
/// distances, without an artificial extra internal edge. The synthesized
/// root gets no relation of its own.
fn resolve_trifurcation(
    dist: &DistanceMatrix,
    ids: &[NodeId],
    relations: &mut RelationMap,
) -> NodeId {
    let last: Vec<usize> = dist.active_indices().collect();
    debug_assert_eq!(last.len(), 3);
    let (a, b, c) = (last[0], last[1], last[2]);

    let d_ab = dist.get(a, b);
    let d_ac = dist.get(a, c);
    let d_bc = dist.get(b, c);
    let edge_a = 0.5 * (d_ab + d_ac - d_bc);
    let edge_b = 0.5 * (d_ab + d_bc - d_ac);
    let edge_c = 0.5 * (d_ac + d_bc - d_ab);

    let root = ids[a].merged(&ids[b]).merged(&ids[c]);
    relations.insert(
        ids[a].clone(),
        Relation {
            parent: root.clone(),
            distance: edge_a,
        },
    );
    relations.insert(
        ids[b].clone(),
        Relation {
            parent: root.clone(),
            distance: edge_b,
        },
    );
    relations.insert(
        ids[c].clone(),
        Relation {
            parent: root.clone(),
            distance: edge_c,
        },
    );
    root
}
