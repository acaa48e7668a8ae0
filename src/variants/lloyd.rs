use crate::{
    distances::DistanceMeasurer,
    error::{KMeansError, Result},
    inits::{validate_k, CentroidChooser},
    memory::*,
    pipeline, recompute, KMeans, KMeansConfig, KMeansState,
};
use std::ops::DerefMut;
use tracing::{debug, info, warn};

pub(crate) struct Lloyd;
impl Lloyd {
    /// Init, then alternate assignment passes and centroid recomputation until no point changes
    /// its cluster, the abort strategy gives up, or `max_iter` passes were run.
    pub fn calculate<T, C, D>(
        data: &KMeans<'_, T>, k: usize, chooser: &C, measurer: &D, config: &KMeansConfig<'_, T>,
    ) -> Result<KMeansState<T>>
    where
        T: Primitive,
        C: CentroidChooser<T> + ?Sized,
        D: DistanceMeasurer<T> + ?Sized,
    {
        let points = data.points();
        validate_k(points, k)?;
        let settings = config.pass_settings(points.rows());

        let centroids = chooser.choose_centroids(points, k, config.rnd.borrow_mut().deref_mut())?;
        if centroids.rows() != k || centroids.cols() != points.cols() {
            return Err(KMeansError::chooser_failure(format!(
                "chooser returned {}x{} centroids, expected {}x{}",
                centroids.rows(), centroids.cols(), k, points.cols()
            )));
        }

        // Initialize clusters and notify subscriber
        let mut state = KMeansState::new(points.rows(), centroids);
        (config.init_done)(&state);
        debug!(k, samples = points.rows(), workers = settings.workers, queue_capacity = settings.queue_capacity, "centroids initialized");
        let mut abort_strategy = config.abort_strategy.create_logic();

        loop {
            state.iterations += 1;
            let changed = pipeline::assign_pass(points, &state.centroids, &mut state.assignments, measurer, settings)?;
            let new_distsum = state.assignments.distsum();
            state.centroid_frequency = state.assignments.frequencies(k);

            // Notify subscriber about finished iteration
            (config.iteration_done)(&state, state.iterations, new_distsum);
            debug!(iteration = state.iterations, changed, distsum = %new_distsum, "assignment pass done");
            let proceed = abort_strategy.next(changed, new_distsum);
            state.distsum = new_distsum;

            if !changed {
                state.converged = true;
                info!(iterations = state.iterations, distsum = %state.distsum, "converged");
                break;
            }
            if !proceed {
                info!(iterations = state.iterations, distsum = %state.distsum, "stopped by abort strategy");
                break;
            }
            if state.iterations >= config.max_iter {
                warn!(max_iter = config.max_iter, distsum = %state.distsum, "iteration limit reached before convergence");
                break;
            }
            recompute::recompute_centroids(points, &mut state.assignments, &mut state.centroids, config.empty_cluster_policy)?;
        }
        Ok(state)
    }
}
