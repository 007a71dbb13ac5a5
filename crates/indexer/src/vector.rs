//! Sparse and dense vectors over the term space.
//!
//! Item vectors are sparse (a synopsis touches a handful of columns out of
//! thousands). Profiles are dense: they are the sum of many item vectors
//! and are dotted against every item on each request.

use serde::{Deserialize, Serialize};

/// Sparse vector stored as (column, weight) pairs sorted by column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    /// Build from arbitrary (column, weight) pairs.
    ///
    /// Entries are sorted by column; duplicate columns are summed and zero
    /// weights dropped.
    pub fn from_entries(mut entries: Vec<(usize, f32)>) -> Self {
        entries.sort_unstable_by_key(|&(column, _)| column);

        let mut merged: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
        for (column, weight) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == column => last.1 += weight,
                _ => merged.push((column, weight)),
            }
        }
        merged.retain(|&(_, weight)| weight != 0.0);

        Self { entries: merged }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.entries
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f32>()
            .sqrt()
    }

    /// Scale to unit L2 norm. The zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for entry in &mut self.entries {
                entry.1 /= norm;
            }
        }
    }

    /// Dot product of two sparse vectors (merge over sorted columns)
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fixed-dimension dense vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseVector {
    values: Vec<f32>,
}

impl DenseVector {
    pub fn zeros(dimension: usize) -> Self {
        Self {
            values: vec![0.0; dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// `self += factor * sparse`. Columns past the dimension are ignored.
    pub fn add_sparse(&mut self, sparse: &SparseVector, factor: f32) {
        for &(column, weight) in sparse.entries() {
            if let Some(value) = self.values.get_mut(column) {
                *value += factor * weight;
            }
        }
    }

    /// `self -= factor * other`
    pub fn sub_scaled(&mut self, other: &DenseVector, factor: f32) {
        for (value, &o) in self.values.iter_mut().zip(other.values.iter()) {
            *value -= factor * o;
        }
    }

    pub fn scale(&mut self, factor: f32) {
        for value in &mut self.values {
            *value *= factor;
        }
    }

    /// Dot product with a sparse vector. The zero vector dots to `+0.0`.
    pub fn dot_sparse(&self, sparse: &SparseVector) -> f32 {
        sparse
            .entries()
            .iter()
            .filter_map(|&(column, weight)| self.values.get(column).map(|v| v * weight))
            .fold(0.0, |acc, x| acc + x)
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entries_sorts_and_merges() {
        let v = SparseVector::from_entries(vec![(3, 1.0), (1, 2.0), (3, 0.5), (2, 0.0)]);
        assert_eq!(v.entries(), &[(1, 2.0), (3, 1.5)]);
    }

    #[test]
    fn test_normalize() {
        let mut v = SparseVector::from_entries(vec![(0, 3.0), (4, 4.0)]);
        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.entries()[0].1 - 0.6).abs() < 1e-6);

        let mut zero = SparseVector::default();
        zero.normalize();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector::from_entries(vec![(0, 1.0), (2, 2.0), (5, 1.0)]);
        let b = SparseVector::from_entries(vec![(2, 3.0), (5, 4.0), (9, 1.0)]);
        assert_eq!(a.dot(&b), 10.0);
    }

    #[test]
    fn test_dense_operations() {
        let a = SparseVector::from_entries(vec![(0, 1.0), (2, 2.0)]);
        let b = SparseVector::from_entries(vec![(1, 4.0), (2, 2.0)]);

        let mut dense = DenseVector::zeros(3);
        dense.add_sparse(&a, 1.0);
        dense.add_sparse(&b, 1.0);
        dense.scale(0.5);
        assert_eq!(dense.values(), &[0.5, 2.0, 2.0]);

        let mut other = DenseVector::zeros(3);
        other.add_sparse(&a, 1.0);
        dense.sub_scaled(&other, 0.5);
        assert_eq!(dense.values(), &[0.0, 2.0, 1.0]);

        assert_eq!(dense.dot_sparse(&b), 10.0);
    }

    #[test]
    fn test_dot_with_zero_vector_is_positive_zero() {
        let dense = DenseVector::zeros(3);
        let sparse = SparseVector::from_entries(vec![(1, 0.5)]);

        let empty = dense.dot_sparse(&SparseVector::default());
        assert_eq!(empty.to_bits(), 0.0f32.to_bits());
        assert!(dense.dot_sparse(&sparse).is_sign_positive());
    }
}
