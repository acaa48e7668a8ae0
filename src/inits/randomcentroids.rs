use crate::error::{KMeansError, Result};
use crate::inits::{validate_k, CentroidChooser};
use crate::memory::{Matrix, Primitive};
use rand::prelude::*;

/// Synthesizes centroids at random: every coordinate is drawn uniformly between the smallest
/// and largest value observed in its column.
pub struct RandomCentroids;

impl<T: Primitive> CentroidChooser<T> for RandomCentroids {
    fn choose_centroids(&self, points: &Matrix<T>, k: usize, rnd: &mut dyn RngCore) -> Result<Matrix<T>> {
        validate_k(points, k)?;
        let mut centroids = Matrix::zeros(k, points.cols());
        for col in 0..points.cols() {
            let (min, max) = points.column_bounds(col)
                .filter(|(min, max)| min.is_finite() && max.is_finite())
                .ok_or_else(|| KMeansError::chooser_failure(format!("column {} has no finite bounds", col)))?;
            // uniform sampling needs a representable span
            if !(max - min).is_finite() {
                return Err(KMeansError::chooser_failure(format!("range of column {} overflows", col)));
            }
            for ci in 0..k {
                centroids.set(ci, col, rnd.gen_range(min..=max));
            }
        }
        Ok(centroids)
    }
}
