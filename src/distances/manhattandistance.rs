use crate::{DistanceMeasurer, Primitive};

pub struct ManhattanDistance;

impl<T: Primitive> DistanceMeasurer<T> for ManhattanDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        a.iter().cloned()
            .zip(b.iter().cloned())
            .map(|(av, bv)| (av - bv).abs())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_block() {
        let (a, b) = ([1.0f64, -1.0], [4.0f64, 3.0]);
        assert_eq!(ManhattanDistance.distance(&a, &b), 7.0);
        // squared distance squares the whole sum
        assert_eq!(ManhattanDistance.squared_distance(&a, &b), 49.0);
    }
}
