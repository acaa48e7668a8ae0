use crate::error::{KMeansError, Result};
use crate::inits::{validate_k, CentroidChooser};
use crate::memory::{Matrix, Primitive};
use rand::prelude::*;
use std::f64::consts::PI;

/// Lays the centroids out evenly along an ellipse centred in the bounding box of the data.
///
/// The ellipse spans the first two columns; its radii are **frac** times half the column range,
/// so `frac = 1.0` touches the edges of the bounding box. Further columns are set to their
/// midpoint. The starting angle is random.
pub struct EllipseCentroids {
    frac: f64,
}
impl EllipseCentroids {
    pub fn new(frac: f64) -> Self {
        Self { frac }
    }
}

impl<T: Primitive> CentroidChooser<T> for EllipseCentroids {
    fn choose_centroids(&self, points: &Matrix<T>, k: usize, rnd: &mut dyn RngCore) -> Result<Matrix<T>> {
        validate_k(points, k)?;
        if !(self.frac > 0.0 && self.frac <= 1.0) {
            return Err(KMeansError::invalid_input(format!("ellipse fraction {} is not in (0, 1]", self.frac)));
        }

        let bounds = (0..points.cols())
            .map(|col| {
                points.column_bounds(col)
                    .and_then(|(min, max)| Some((min.to_f64()?, max.to_f64()?)))
                    .filter(|(min, max)| min.is_finite() && max.is_finite())
                    .ok_or_else(|| KMeansError::chooser_failure(format!("column {} has no finite bounds", col)))
            })
            .collect::<Result<Vec<_>>>()?;

        let theta_init = rnd.gen_range(0.0..PI);
        let step = 2.0 * PI / k as f64;
        let mut centroids = Matrix::zeros(k, points.cols());
        for ci in 0..k {
            let theta = theta_init + step * ci as f64;
            for (col, (min, max)) in bounds.iter().cloned().enumerate() {
                // halves first, so spans close to f64::MAX do not overflow
                let (center, radius) = (min / 2.0 + max / 2.0, (max / 2.0 - min / 2.0) * self.frac);
                let v = match col {
                    0 => center + radius * theta.cos(),
                    1 => center + radius * theta.sin(),
                    _ => center,
                };
                let v = T::from(v).ok_or_else(|| KMeansError::chooser_failure(format!("{} is not representable", v)))?;
                centroids.set(ci, col, v);
            }
        }
        Ok(centroids)
    }
}
