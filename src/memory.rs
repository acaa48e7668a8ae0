use crate::error::{KMeansError, Result};
use num::{Float, NumCast, Zero};
use rand::distributions::uniform::SampleUniform;
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

pub trait Primitive: Add + AddAssign + Sum + Sub + SubAssign + Zero + Float + NumCast + SampleUniform
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> + for<'a> Sub<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}

/// Lossless for every cluster index / count this crate produces.
#[inline(always)]
pub(crate) fn from_usize<T: Primitive>(v: usize) -> T {
    T::from(v).unwrap_or_else(T::nan)
}


/// Dense, row-major matrix of points (or centroids).
///
/// ## Fields
/// - **rows**: Amount of rows (points / clusters)
/// - **cols**: Amount of coordinates per row
/// - **data**: Values [row-major] = [<row0>,<row1>,<row2>,...]
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T: Primitive> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}
impl<T: Primitive> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![T::zero(); rows * cols] }
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![T::one(); rows * cols] }
    }

    /// Wrap a row-major buffer. Fails if `data` does not hold exactly `rows * cols` values.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(KMeansError::invalid_input(format!(
                "buffer of {} values cannot form a {}x{} matrix", data.len(), rows, cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from individual rows, which all have to share the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(KMeansError::invalid_input(format!(
                "row {} has {} columns, expected {}", bad, rows[bad].len(), cols
            )));
        }
        Ok(Self { rows: rows.len(), cols, data: rows.concat() })
    }

    #[inline(always)] pub fn rows(&self) -> usize { self.rows }
    #[inline(always)] pub fn cols(&self) -> usize { self.cols }
    #[inline(always)] pub fn is_empty(&self) -> bool { self.rows == 0 }
    #[inline(always)] pub fn as_slice(&self) -> &[T] { &self.data }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    #[inline(always)]
    pub fn row(&self, idx: usize) -> &[T] {
        &self.data[idx * self.cols..(idx + 1) * self.cols]
    }

    #[inline(always)]
    pub fn row_mut(&mut self, idx: usize) -> &mut [T] {
        &mut self.data[idx * self.cols..(idx + 1) * self.cols]
    }

    /// Yields exactly `rows()` slices, which are empty for a zero-column matrix.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |idx| self.row(idx))
    }

    /// Copy the given rows (in the given order) into a new matrix.
    pub fn select_rows(&self, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut data = Vec::new();
        let mut rows = 0;
        for idx in indices {
            data.extend_from_slice(self.row(idx));
            rows += 1;
        }
        Self { rows, cols: self.cols, data }
    }

    /// Smallest and largest value of column `col`, or `None` for an empty matrix.
    pub fn column_bounds(&self, col: usize) -> Option<(T, T)> {
        self.iter_rows().map(|r| r[col]).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}


/// Per-point cluster membership, as produced by the result aggregator.
///
/// Each point row holds the index of its assigned centroid (`None` until the first assignment)
/// and the squared distance to that centroid. Only the aggregator (and the empty-cluster
/// reseeding of the recompute step, which runs strictly between passes) writes to it.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentMatrix<T: Primitive> {
    clusters: Vec<Option<usize>>,
    sq_distances: Vec<T>,
}
impl<T: Primitive> AssignmentMatrix<T> {
    pub fn new(rows: usize) -> Self {
        Self { clusters: vec![None; rows], sq_distances: vec![T::zero(); rows] }
    }

    #[inline(always)] pub fn len(&self) -> usize { self.clusters.len() }
    #[inline(always)] pub fn is_empty(&self) -> bool { self.clusters.is_empty() }
    #[inline(always)] pub fn cluster(&self, row: usize) -> Option<usize> { self.clusters[row] }
    #[inline(always)] pub fn sq_distance(&self, row: usize) -> T { self.sq_distances[row] }
    pub fn clusters(&self) -> &[Option<usize>] { &self.clusters }
    pub fn sq_distances(&self) -> &[T] { &self.sq_distances }

    /// Overwrite `row`; returns whether its cluster differs from the previous one.
    /// A row that never had a cluster always counts as changed.
    pub(crate) fn record(&mut self, row: usize, cluster: usize, sq_distance: T) -> bool {
        let prev = self.clusters[row].replace(cluster);
        self.sq_distances[row] = sq_distance;
        prev != Some(cluster)
    }

    /// Point rows currently assigned to `cluster`, ascending.
    pub fn members(&self, cluster: usize) -> impl Iterator<Item = usize> + '_ {
        self.clusters.iter().enumerate()
            .filter(move |(_, c)| **c == Some(cluster))
            .map(|(row, _)| row)
    }

    /// Amount of points per cluster.
    pub fn frequencies(&self, k: usize) -> Vec<usize> {
        let mut centroid_frequency = vec![0usize; k];
        self.clusters.iter().flatten()
            .filter(|c| **c < k)
            .for_each(|c| centroid_frequency[*c] += 1);
        centroid_frequency
    }

    /// Total of all squared distances.
    pub fn distsum(&self) -> T {
        self.sq_distances.iter().cloned().sum()
    }

    /// Render as `rows × 2`: column 0 = centroid index, column 1 = squared distance.
    /// Rows that were never assigned read as zero.
    pub fn to_matrix(&self) -> Matrix<T> {
        let data = self.clusters.iter().zip(self.sq_distances.iter())
            .flat_map(|(c, d)| [c.map(from_usize).unwrap_or_else(T::zero), *d])
            .collect();
        Matrix { rows: self.clusters.len(), cols: 2, data }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_shapes() {
        assert!(Matrix::<f64>::from_vec(vec![1.0, 2.0, 3.0], 2, 2).is_err());
        let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.iter_rows().count(), 3);
        assert_eq!(m.select_rows([2, 0]).as_slice(), &[5.0, 6.0, 1.0, 2.0]);
        assert_eq!(m.column_bounds(1), Some((2.0, 6.0)));

        let empty = Matrix::<f32>::zeros(0, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.iter_rows().count(), 0);
        assert_eq!(empty.column_bounds(0), None);

        let no_cols = Matrix::<f64>::zeros(3, 0);
        assert_eq!(no_cols.iter_rows().count(), 3);
        assert!(no_cols.iter_rows().all(|r| r.is_empty()));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let res = Matrix::from_rows(&[vec![1.0f64, 2.0], vec![3.0]]);
        assert!(matches!(res, Err(KMeansError::InvalidInput { .. })));
        let ok = Matrix::from_rows(&[vec![1.0f64, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(ok.get(1, 0), 3.0);
    }

    #[test]
    fn assignment_changes() {
        let mut a = AssignmentMatrix::<f64>::new(3);
        // first assignment always counts, even to cluster 0
        assert!(a.record(0, 0, 1.0));
        assert!(!a.record(0, 0, 0.5));
        assert!(a.record(0, 1, 0.25));
        a.record(2, 1, 2.0);

        assert_eq!(a.members(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(a.frequencies(2), vec![0, 2]);
        assert_eq!(a.distsum(), 2.25);
        assert_eq!(a.to_matrix().as_slice(), &[1.0, 0.25, 0.0, 0.0, 1.0, 2.0]);
    }
}
