use crate::{DistanceMeasurer, Primitive};

pub struct EuclideanDistance;

impl<T: Primitive> DistanceMeasurer<T> for EuclideanDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        self.squared_distance(a, b).sqrt()
    }

    #[inline(always)]
    fn squared_distance(&self, a: &[T], b: &[T]) -> T {
        a.iter().cloned()
            .zip(b.iter().cloned())
            .map(|(av, bv)| av - bv)         // <a> - <b>
            .map(|v| v * v)                  // <vec_components> ^2
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pythagorean_triple() {
        let (a, b) = ([0.0f64, 0.0], [3.0f64, 4.0]);
        assert_eq!(EuclideanDistance.distance(&a, &b), 5.0);
        assert_eq!(EuclideanDistance.squared_distance(&a, &b), 25.0);
        assert_eq!(EuclideanDistance.distance(&b, &a), 5.0);
    }

    #[test]
    fn identical_points() {
        let p = [1.5f32, -2.0, 7.25];
        assert_eq!(EuclideanDistance.distance(&p, &p), 0.0);
    }
}
