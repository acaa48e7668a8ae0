use crate::distances::{DistanceMeasurer, EuclideanDistance};
use crate::error::{KMeansError, Result};
use crate::inits::{validate_k, CentroidChooser};
use crate::memory::{Matrix, Primitive};
use rand::{distributions::WeightedIndex, prelude::*};

/// K-Means++ initialization.
///
/// ## Description
/// This initialization method starts by selecting one sample as first centroid.
/// Proceeding from there, the method iteratively selects one new centroid (per iteration) by calculating
/// each sample's probability of "being a centroid". This probability is bigger, the farther away a sample
/// is from its nearest centroid chosen so far. Then, one sample is randomly selected, while taking
/// their probability of being the next centroid into account.
pub struct KMeansPlusPlus;

impl<T: Primitive> CentroidChooser<T> for KMeansPlusPlus {
    fn choose_centroids(&self, points: &Matrix<T>, k: usize, rnd: &mut dyn RngCore) -> Result<Matrix<T>> {
        validate_k(points, k)?;
        let mut centroids = Matrix::zeros(k, points.cols());

        // Randomly select first centroid
        let first_idx = rnd.gen_range(0..points.rows());
        centroids.row_mut(0).copy_from_slice(points.row(first_idx));
        let mut nearest: Vec<T> = points.iter_rows()
            .map(|p| EuclideanDistance.squared_distance(p, centroids.row(0)))
            .collect();

        for ci in 1..k {
            let distsum: T = nearest.iter().cloned().sum();
            if !(distsum > T::zero()) {
                return Err(KMeansError::chooser_failure(format!("fewer than {} distinct points", k)));
            }
            // Use rand's WeightedIndex to randomly draw a centroid, while respecting their probabilities
            let centroid_index = WeightedIndex::new(nearest.iter().map(|d| *d / distsum))
                .map_err(|e| KMeansError::chooser_failure(e.to_string()))?;
            let sampled_centroid_id = centroid_index.sample(rnd);
            centroids.row_mut(ci).copy_from_slice(points.row(sampled_centroid_id));

            let centroid = centroids.row(ci);
            nearest.iter_mut().zip(points.iter_rows())
                .for_each(|(n, p)| {
                    let d = EuclideanDistance.squared_distance(p, centroid);
                    if d < *n {
                        *n = d;
                    }
                });
        }
        Ok(centroids)
    }
}
