use crate::error::{KMeansError, Result};
use crate::inits::{validate_k, CentroidChooser};
use crate::memory::{Matrix, Primitive};
use rand::RngCore;

/// Hands out a fixed, caller-supplied centroid matrix.
pub struct PrecomputedCentroids<T: Primitive> {
    centroids: Matrix<T>,
}
impl<T: Primitive> PrecomputedCentroids<T> {
    pub fn new(centroids: Matrix<T>) -> Self {
        Self { centroids }
    }
}

impl<T: Primitive> CentroidChooser<T> for PrecomputedCentroids<T> {
    fn choose_centroids(&self, points: &Matrix<T>, k: usize, _rnd: &mut dyn RngCore) -> Result<Matrix<T>> {
        validate_k(points, k)?;
        if self.centroids.rows() != k || self.centroids.cols() != points.cols() {
            return Err(KMeansError::chooser_failure(format!(
                "precomputed centroids are {}x{}, expected {}x{}",
                self.centroids.rows(), self.centroids.cols(), k, points.cols()
            )));
        }
        Ok(self.centroids.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn shape_must_match() {
        let points = Matrix::<f64>::zeros(5, 2);
        let chooser = PrecomputedCentroids::new(Matrix::ones(2, 2));
        let mut rnd = StdRng::seed_from_u64(0);
        assert_eq!(chooser.choose_centroids(&points, 2, &mut rnd).unwrap(), Matrix::ones(2, 2));
        assert!(matches!(chooser.choose_centroids(&points, 3, &mut rnd), Err(KMeansError::ChooserFailure { .. })));
        assert!(matches!(chooser.choose_centroids(&Matrix::zeros(5, 3), 2, &mut rnd), Err(KMeansError::ChooserFailure { .. })));
    }
}
