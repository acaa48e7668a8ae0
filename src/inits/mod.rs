use crate::error::{KMeansError, Result};
use crate::memory::{Matrix, Primitive};
use rand::RngCore;

pub(crate) mod datacentroids;
pub(crate) mod ellipsecentroids;
pub(crate) mod kmeanplusplus;
pub(crate) mod precomputed;
pub(crate) mod randomcentroids;

pub use datacentroids::DataCentroids;
pub use ellipsecentroids::EllipseCentroids;
pub use kmeanplusplus::KMeansPlusPlus;
pub use precomputed::PrecomputedCentroids;
pub use randomcentroids::RandomCentroids;

/// Strategy producing the initial `k × cols` centroid matrix for a run.
///
/// Every chooser fails with [`KMeansError::InvalidInput`] when the point matrix is empty or
/// `k` is not within `1..=rows`. Closures with the same signature can be used as choosers, too.
pub trait CentroidChooser<T: Primitive> {
    fn choose_centroids(&self, points: &Matrix<T>, k: usize, rnd: &mut dyn RngCore) -> Result<Matrix<T>>;
}

impl<T, F> CentroidChooser<T> for F
where
    T: Primitive,
    F: Fn(&Matrix<T>, usize, &mut dyn RngCore) -> Result<Matrix<T>>,
{
    fn choose_centroids(&self, points: &Matrix<T>, k: usize, rnd: &mut dyn RngCore) -> Result<Matrix<T>> {
        self(points, k, rnd)
    }
}

pub(crate) fn validate_k<T: Primitive>(points: &Matrix<T>, k: usize) -> Result<()> {
    if points.is_empty() || points.cols() == 0 {
        return Err(KMeansError::invalid_input("point matrix is empty"));
    }
    if k == 0 || k > points.rows() {
        return Err(KMeansError::invalid_input(format!(
            "k = {} is out of range for {} points", k, points.rows()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn choosers() -> Vec<Box<dyn CentroidChooser<f64>>> {
        vec![
            Box::new(RandomCentroids),
            Box::new(DataCentroids),
            Box::new(EllipseCentroids::new(0.5)),
            Box::new(KMeansPlusPlus),
        ]
    }

    #[test]
    fn every_chooser_returns_k_by_cols() {
        let points = Matrix::from_vec(vec![1.0, 2.0, 3.0, -4.945, 5.0, -6.1, 7.0, 8.0, 9.0], 3, 3).unwrap();
        let mut rnd = StdRng::seed_from_u64(1337);
        for chooser in choosers() {
            let centroids = chooser.choose_centroids(&points, 2, &mut rnd).unwrap();
            assert_eq!((centroids.rows(), centroids.cols()), (2, 3));
            assert!(centroids.as_slice().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn every_chooser_rejects_bad_k() {
        let points = Matrix::<f64>::ones(3, 2);
        let empty = Matrix::<f64>::zeros(0, 2);
        let mut rnd = StdRng::seed_from_u64(1);
        for chooser in choosers() {
            for k in [0, 4] {
                let res = chooser.choose_centroids(&points, k, &mut rnd);
                assert!(matches!(res, Err(KMeansError::InvalidInput { .. })), "k = {}", k);
            }
            let res = chooser.choose_centroids(&empty, 1, &mut rnd);
            assert!(matches!(res, Err(KMeansError::InvalidInput { .. })));
        }
    }

    #[test]
    fn closure_as_chooser() {
        let points = Matrix::<f64>::ones(4, 2);
        let chooser = |p: &Matrix<f64>, k: usize, _: &mut dyn RngCore| -> Result<Matrix<f64>> { Ok(p.select_rows(0..k)) };
        let centroids = chooser.choose_centroids(&points, 2, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(centroids, Matrix::ones(2, 2));
    }
}
