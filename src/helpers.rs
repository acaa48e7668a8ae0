/// Upper bound for the job and result queues, unless configured otherwise.
pub(crate) const MAX_QUEUE_CAPACITY: usize = 1024;

/// One worker per rayon thread, but never more workers than there are points (and at least one).
pub(crate) fn default_worker_count(sample_cnt: usize) -> usize {
    rayon::current_num_threads().min(sample_cnt).max(1)
}

pub(crate) fn default_queue_capacity(sample_cnt: usize) -> usize {
    sample_cnt.clamp(1, MAX_QUEUE_CAPACITY)
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-9))
}
