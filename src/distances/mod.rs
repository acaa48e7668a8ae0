use crate::memory::Primitive;

mod euclideandistance;
mod manhattandistance;

pub use euclideandistance::EuclideanDistance;
pub use manhattandistance::ManhattanDistance;

/// Distance metric used to pair points with their nearest centroid.
///
/// Implementations have to be pure: the same two (equally long) coordinate slices always
/// yield the same non-negative value. They are shared read-only between all workers of a pass.
pub trait DistanceMeasurer<T: Primitive>: Send + Sync {
    fn distance(&self, a: &[T], b: &[T]) -> T;

    /// Distance without the final root, where the metric has one. This is the value
    /// that ends up in the assignment matrix.
    #[inline(always)]
    fn squared_distance(&self, a: &[T], b: &[T]) -> T {
        let d = self.distance(a, b);
        d * d
    }
}
