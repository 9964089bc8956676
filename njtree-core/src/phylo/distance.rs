use bit_set::BitSet;

use crate::error::{NjError, NjResult};

/// Symmetric pairwise distance matrix with an active-taxon mask and
/// incrementally maintained row sums.
///
/// The matrix is a dense row-major buffer mutated in place during
/// neighbor-joining reduction. Once an index is deactivated its row and
/// column go stale and are never read again.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    labels: Vec<Box<str>>,
    data: Vec<f64>,
    n: usize,
    active: BitSet,
    row_sums: Vec<f64>,
}

impl DistanceMatrix {
    /// Validates and wraps an `n * n` row-major distance matrix.
    ///
    /// Rejects an empty matrix, a data length other than `labels.len()^2`,
    /// asymmetric entries, negative distances, a nonzero diagonal, and
    /// duplicate labels. Duplicate labels would make the concatenated
    /// cluster identifiers ambiguous, so they are refused up front.
    pub fn new(labels: Vec<Box<str>>, data: Vec<f64>) -> NjResult<Self> {
        let n = labels.len();
        if n == 0 {
            return Err(NjError::EmptyMatrix);
        }
        if data.len() != n * n {
            return Err(NjError::DataLenMismatch {
                expected: n * n,
                got: data.len(),
            });
        }
        for i in 0..n {
            if data[i * n + i] != 0.0 {
                return Err(NjError::NonzeroDiagonal {
                    i,
                    value: data[i * n + i],
                });
            }
            for j in (i + 1)..n {
                let upper = data[i * n + j];
                let lower = data[j * n + i];
                if upper != lower {
                    return Err(NjError::AsymmetricDistance { i, j, upper, lower });
                }
                if upper < 0.0 {
                    return Err(NjError::NegativeDistance {
                        i,
                        j,
                        value: upper,
                    });
                }
            }
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(NjError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }

        let mut active = BitSet::with_capacity(n);
        active.extend(0..n);
        let row_sums = (0..n)
            .map(|i| data[i * n..(i + 1) * n].iter().sum())
            .collect();

        Ok(Self {
            labels,
            data,
            n,
            active,
            row_sums,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn labels(&self) -> &[Box<str>] {
        &self.labels
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Writes a cell symmetrically.
    pub fn set(&mut self, i: usize, j: usize, val: f64) {
        self.data[i * self.n + j] = val;
        self.data[j * self.n + i] = val;
    }

    pub fn row_sum(&self, i: usize) -> f64 {
        self.row_sums[i]
    }

    pub fn set_row_sum(&mut self, i: usize, val: f64) {
        self.row_sums[i] = val;
    }

    pub fn is_active(&self, i: usize) -> bool {
        self.active.contains(i)
    }

    /// Removes `i` from the active set. Indices are never reactivated.
    pub fn deactivate(&mut self, i: usize) {
        self.active.remove(i);
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active indices in ascending order.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter()
    }
}
