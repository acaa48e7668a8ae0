use crate::error::{KMeansError, Result};
use crate::memory::{AssignmentMatrix, Matrix, Primitive};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::warn;

/// What the recompute step does with a cluster that did not receive a single point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Leave the centroid where it is (and log a warning).
    #[default]
    KeepCentroid,
    /// Abort the run with [`KMeansError::EmptyCluster`].
    Fail,
    /// Move the centroid onto the sample that is farthest away from its own centroid, taking that
    /// sample from a cluster that keeps at least one other sample. Samples lying exactly on their
    /// centroid are never taken; without any candidate the centroid is kept.
    Reseed,
}

/// Arithmetic mean of every column of **points**, as a `1 × cols` matrix.
/// Fails with [`KMeansError::EmptyInput`] if there are no rows.
pub fn compute_centroid<T: Primitive>(points: &Matrix<T>) -> Result<Matrix<T>> {
    if points.is_empty() {
        return Err(KMeansError::EmptyInput);
    }
    let mut mean = vec![T::zero(); points.cols()];
    let mut cnt = T::zero();
    for p in points.iter_rows() {
        mean.iter_mut().zip(p.iter()).for_each(|(m, v)| *m += v);
        cnt += T::one();
    }
    mean.iter_mut().for_each(|m| *m = *m / cnt);
    Matrix::from_vec(mean, 1, points.cols())
}

/// Replace every centroid by the mean of the points currently assigned to it.
///
/// Must only run between two assignment passes. Returns the indices of the clusters that were
/// empty, after they have been handled according to **policy**.
pub fn recompute_centroids<T: Primitive>(
    points: &Matrix<T>, assignments: &mut AssignmentMatrix<T>, centroids: &mut Matrix<T>, policy: EmptyClusterPolicy,
) -> Result<Vec<usize>> {
    let means: Vec<Option<Matrix<T>>> = {
        let assignments = &*assignments;
        (0..centroids.rows()).into_par_iter()
            .map(|ci| compute_centroid(&points.select_rows(assignments.members(ci))).ok()) // Err <=> no members
            .collect()
    };

    let empty: Vec<usize> = means.iter().enumerate()
        .filter(|(_, m)| m.is_none())
        .map(|(ci, _)| ci)
        .collect();
    for (ci, mean) in means.into_iter().enumerate() {
        if let Some(mean) = mean {
            centroids.row_mut(ci).copy_from_slice(mean.row(0));
        }
    }
    for &cluster in &empty {
        match policy {
            EmptyClusterPolicy::KeepCentroid => warn!(cluster, "cluster has no points, keeping its centroid"),
            EmptyClusterPolicy::Reseed => reseed_cluster(points, assignments, centroids, cluster)?,
            EmptyClusterPolicy::Fail => return Err(KMeansError::EmptyCluster { cluster }),
        }
    }
    Ok(empty)
}

fn reseed_cluster<T: Primitive>(
    points: &Matrix<T>, assignments: &mut AssignmentMatrix<T>, centroids: &mut Matrix<T>, cluster: usize,
) -> Result<()> {
    let centroid_frequency = assignments.frequencies(centroids.rows());
    // Find the sample with the highest distance to its centroid, that is not alone in its cluster.
    // A sample sitting on its centroid would tie back to the lower index on the next pass.
    let farthest = (0..assignments.len())
        .filter(|&row| assignments.sq_distance(row) > T::zero())
        .filter(|&row| assignments.cluster(row).map_or(false, |c| centroid_frequency[c] > 1))
        .max_by(|&a, &b| {
            assignments.sq_distance(a).partial_cmp(&assignments.sq_distance(b)).unwrap_or(Ordering::Equal)
        });
    let (sample_id, prev_centroid_id) = match farthest.and_then(|row| Some((row, assignments.cluster(row)?))) {
        Some(found) => found,
        None => {
            warn!(cluster, "no sample to reseed from, keeping its centroid");
            return Ok(());
        }
    };

    // Centroid is moved into the chosen point -> the point's centroid distance is 0
    assignments.record(sample_id, cluster, T::zero());
    centroids.row_mut(cluster).copy_from_slice(points.row(sample_id));
    let donor_mean = compute_centroid(&points.select_rows(assignments.members(prev_centroid_id)))?;
    centroids.row_mut(prev_centroid_id).copy_from_slice(donor_mean.row(0));

    warn!(cluster, sample_id, from = prev_centroid_id, "reseeded empty cluster");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pipeline, EuclideanDistance};

    #[test]
    fn compute_centroid_means() {
        assert!(matches!(compute_centroid(&Matrix::<f64>::zeros(0, 0)), Err(KMeansError::EmptyInput)));

        let mut two_by_two = Matrix::<f64>::ones(2, 2);
        let mut expected = Matrix::from_vec(vec![1.0, 1.0], 1, 2).unwrap();
        assert_eq!(compute_centroid(&two_by_two).unwrap(), expected);

        two_by_two.set(0, 0, 3.0);
        expected.set(0, 0, 2.0);
        assert_eq!(compute_centroid(&two_by_two).unwrap(), expected);
    }

    fn two_groups() -> (Matrix<f64>, AssignmentMatrix<f64>) {
        let points = Matrix::from_vec(vec![0.0, 0.0, 2.0, 2.0, 10.0, 10.0, 12.0, 14.0], 4, 2).unwrap();
        let mut assignments = AssignmentMatrix::new(4);
        assignments.record(0, 0, 1.0);
        assignments.record(1, 0, 1.0);
        assignments.record(2, 1, 1.0);
        assignments.record(3, 1, 1.0);
        (points, assignments)
    }

    #[test]
    fn empty_cluster_keeps_centroid() {
        let (points, mut assignments) = two_groups();
        let mut centroids = Matrix::from_vec(vec![5.0, 5.0, 6.0, 6.0, -7.0, 7.0], 3, 2).unwrap();

        let empty = recompute_centroids(&points, &mut assignments, &mut centroids, EmptyClusterPolicy::KeepCentroid).unwrap();
        assert_eq!(empty, vec![2]);
        assert_eq!(centroids.as_slice(), &[1.0, 1.0, 11.0, 12.0, -7.0, 7.0]);
    }

    #[test]
    fn empty_cluster_fails() {
        let (points, mut assignments) = two_groups();
        let mut centroids = Matrix::<f64>::zeros(3, 2);
        let res = recompute_centroids(&points, &mut assignments, &mut centroids, EmptyClusterPolicy::Fail);
        assert!(matches!(res, Err(KMeansError::EmptyCluster { cluster: 2 })));
    }

    #[test]
    fn empty_cluster_reseeds() {
        let points = Matrix::from_vec(vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0], 3, 2).unwrap();
        let mut centroids = Matrix::from_vec(vec![2.0, 0.0, 1337.0, 0.0], 2, 2).unwrap();
        let mut assignments = AssignmentMatrix::new(3);
        let settings = pipeline::PassSettings { workers: 2, queue_capacity: 2 };
        pipeline::assign_pass(&points, &centroids, &mut assignments, &EuclideanDistance, settings).unwrap();

        let empty = recompute_centroids(&points, &mut assignments, &mut centroids, EmptyClusterPolicy::Reseed).unwrap();
        assert_eq!(empty, vec![1]);
        assert_eq!(centroids.as_slice(), &[1.5, 0.0, 3.0, 0.0]);
        assert_eq!(assignments.clusters(), &[Some(0), Some(0), Some(1)]);
        assert_eq!(assignments.frequencies(2), vec![2, 1]);
    }

    #[test]
    fn reseed_skips_samples_on_their_centroid() {
        let points = Matrix::<f64>::ones(3, 2);
        let mut centroids = Matrix::<f64>::ones(2, 2);
        let mut assignments = AssignmentMatrix::new(3);
        let settings = pipeline::PassSettings { workers: 2, queue_capacity: 2 };
        pipeline::assign_pass(&points, &centroids, &mut assignments, &EuclideanDistance, settings).unwrap();

        let empty = recompute_centroids(&points, &mut assignments, &mut centroids, EmptyClusterPolicy::Reseed).unwrap();
        assert_eq!(empty, vec![1]);
        assert_eq!(centroids, Matrix::ones(2, 2));
        assert_eq!(assignments.frequencies(2), vec![3, 0]);
    }
}
