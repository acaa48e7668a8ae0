use crate::error::{KMeansError, Result};
use crate::inits::{validate_k, CentroidChooser};
use crate::memory::{Matrix, Primitive};
use rand::prelude::*;

/// Random sample initialization (a.k.a. Forgy): k existing points, drawn without replacement.
pub struct DataCentroids;

impl<T: Primitive> CentroidChooser<T> for DataCentroids {
    fn choose_centroids(&self, points: &Matrix<T>, k: usize, rnd: &mut dyn RngCore) -> Result<Matrix<T>> {
        validate_k(points, k)?;
        let chosen: Vec<T> = points.iter_rows()
            .choose_multiple(rnd, k).iter()
            .flat_map(|c| c.iter().cloned())
            .collect();
        if chosen.len() != k * points.cols() {
            return Err(KMeansError::chooser_failure(format!("could not sample {} distinct rows", k)));
        }
        Matrix::from_vec(chosen, k, points.cols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_distinct_rows() {
        let points = Matrix::from_vec((0..20).map(|v| v as f64).collect(), 10, 2).unwrap();
        let mut rnd = StdRng::seed_from_u64(42);
        let centroids = DataCentroids.choose_centroids(&points, 10, &mut rnd).unwrap();

        let mut firsts: Vec<i64> = centroids.iter_rows().map(|c| c[0] as i64).collect();
        firsts.sort_unstable();
        assert_eq!(firsts, (0..20).step_by(2).collect::<Vec<_>>());
        for c in centroids.iter_rows() {
            assert_eq!(c[1], c[0] + 1.0);
        }
    }
}
