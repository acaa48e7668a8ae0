use crate::memory::*;

/// Enum with possible abort strategies.
/// These strategies specify when a running iteration (with the k-means calculation) is aborted.
///
/// Every strategy stops as soon as an assignment pass did not move a single point to another
/// cluster (convergence); the improvement-based strategies may stop earlier.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AbortStrategy<T: Primitive> {
	/// Only stop on convergence.
	#[default]
	NoChange,
	/// This strategy aborts the calculation directly after an iteration produced no improvement where `improvement > threshold`
	/// for the first time.
	/// ## Fields:
	/// - **threshold**: Threshold, used to detect an improvement (`improvement > threshold`)
    NoImprovement { threshold: T },
    /// This strategy aborts the calculation, when there have not been any improvements after **x** iterations,
    /// where `improvement > threshold`.
	/// ## Fields:
	/// - **x**: The amount of consecutive without improvement, after which the calculation is aborted
	/// - **threshold**: Threshold, used to detect an improvement (`improvement > threshold`)
	/// - **abort_on_negative**: Specifies whether the strategy instantly aborts when a negative improvement occured (**true**), or if
	/// negative improvements are handled as "no improvements" (**false**).
	NoImprovementForXIterations { x: usize, threshold: T, abort_on_negative: bool }
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic<T>> {
		match *self {
			AbortStrategy::NoChange => Box::new(NoChangeLogic),
			AbortStrategy::NoImprovementForXIterations{x,threshold,abort_on_negative} => Box::new(NoImprovementForXIterationsLogic {
				x, threshold, abort_on_negative,
				prev_error: T::infinity(),
				no_improvement_counter: 0
			}),
			AbortStrategy::NoImprovement{threshold} => Box::new(NoImprovementLogic {
				threshold,
				prev_error: T::infinity()
			})
		}
	}
}

pub(crate) trait AbortStrategyLogic<T: Primitive> {
	/// Function that has to be called once an assignment pass ended.
	/// ## Arguments
	/// - **changed**: Whether any point changed its cluster during the pass
	/// - **error**: The new error (distsum), after the pass
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation should abort
	fn next(&mut self, changed: bool, error: T) -> bool;
}


pub(crate) struct NoChangeLogic;
impl<T: Primitive> AbortStrategyLogic<T> for NoChangeLogic {
	fn next(&mut self, changed: bool, _error: T) -> bool {
		changed
	}
}


pub(crate) struct NoImprovementLogic<T: Primitive> {
	threshold: T,
	prev_error: T
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementLogic<T> {
	fn next(&mut self, changed: bool, error: T) -> bool {
		let improvement = self.prev_error - error;
		self.prev_error = error;
		changed && improvement > self.threshold
	}
}


pub(crate) struct NoImprovementForXIterationsLogic<T: Primitive> {
	x: usize,
	threshold: T,
	abort_on_negative: bool,
	prev_error: T,
	no_improvement_counter: usize
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementForXIterationsLogic<T> {
	fn next(&mut self, changed: bool, error: T) -> bool {
		let improvement = self.prev_error - error;
		self.prev_error = error;
		if !changed {
			return false;
		}
		if self.abort_on_negative && improvement < T::zero() { // Negative improvement, and instant abort is requested
			return false;
		}
		if improvement > self.threshold { // positive improvement: reset no-improv-counter
			self.no_improvement_counter = 0;
		} else { // Still no improvement, count 1 up
			self.no_improvement_counter += 1;
		}
		self.no_improvement_counter < self.x
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	fn t<T: Primitive>(v: f64) -> T { T::from(v).unwrap() }

	#[test] fn test_no_change_f32() { test_no_change::<f32>(); }
	#[test] fn test_no_change_f64() { test_no_change::<f64>(); }

	fn test_no_change<T: Primitive>() {
		let mut abort_strategy = AbortStrategy::<T>::default().create_logic();
		assert_eq!(abort_strategy.next(true, t(3000.0)), true);
		// no improvement at all does not matter as long as points move
		assert_eq!(abort_strategy.next(true, t(3000.0)), true);
		assert_eq!(abort_strategy.next(true, t(3500.0)), true);
		assert_eq!(abort_strategy.next(false, t(2000.0)), false);
	}

	#[test] fn test_no_improvement_f32() { test_no_improvement::<f32>(); }
	#[test] fn test_no_improvement_f64() { test_no_improvement::<f64>(); }

	fn test_no_improvement<T: Primitive>() {
		let strategy = AbortStrategy::NoImprovement { threshold: t::<T>(0.0005) };
		{
			let mut abort_strategy = strategy.create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(3000.0)), false);
		}
		{
			let mut abort_strategy = strategy.create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(2999.99959)), false);
		}
		{
			let mut abort_strategy = strategy.create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(2999.99935)), true);
		}
		{
			let mut abort_strategy = strategy.create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(2000.0)), true);
			assert_eq!(abort_strategy.next(false, t(1000.0)), false);
		}
	}


	#[test]
	fn test_no_improvement_for_x_iterations_f32() { test_no_improvement_for_x_iterations::<f32>(); }

	#[test]
	fn test_no_improvement_for_x_iterations_f64() { test_no_improvement_for_x_iterations::<f64>(); }

	fn test_no_improvement_for_x_iterations<T: Primitive>() {
		let strategy = |x, abort_on_negative| AbortStrategy::NoImprovementForXIterations {
			x, threshold: t::<T>(0.0005), abort_on_negative };
		{
			let mut abort_strategy = strategy(1, false).create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(3000.0)), false);
		}
		{
			let mut abort_strategy = strategy(1, false).create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(2999.99935)), true);
		}
		// ABORT_ON_NEGATIVE (with negative improvements)
		{
			let mut abort_strategy = strategy(2, true).create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(3001.0)), false);
		}
		{
			let mut abort_strategy = strategy(2, false).create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(3001.0)), true);
			assert_eq!(abort_strategy.next(true, t(3001.0)), false);
		}

		// X != 1
		{
			let mut abort_strategy = strategy(2, false).create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(true, t(2000.0)), true);
			assert_eq!(abort_strategy.next(true, t(2000.0)), true);
			assert_eq!(abort_strategy.next(true, t(1999.0)), true);
			assert_eq!(abort_strategy.next(true, t(1999.0)), true);
			assert_eq!(abort_strategy.next(true, t(1999.0)), false);
		}
		{ // Convergence wins over a pending improvement budget
			let mut abort_strategy = strategy(5, false).create_logic();
			assert_eq!(abort_strategy.next(true, t(3000.0)), true);
			assert_eq!(abort_strategy.next(false, t(2000.0)), false);
		}
	}
}
