use crate::{
    distances::DistanceMeasurer, error::Result, inits::CentroidChooser, memory::*, pipeline::PassSettings,
    recompute::EmptyClusterPolicy, AbortStrategy,
};
use rand::prelude::*;
use std::cell::RefCell;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize, T);

/// Default upper bound for the amount of assign/recompute iterations.
pub const DEFAULT_MAX_ITER: usize = 300;

/// This is a structure holding various configuration options for a k-means calculation, such as
/// the random number generator to use, the size of the worker pool, or a couple of callbacks, that
/// can be set to get status information from a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each assignment pass
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the pass
    /// - **iteration_id**: Number of the current iteration
    /// - **distsum**: New distance sum (**state** contains the distsum from the previous iteration)
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The abort-strategy to use for the running calculation
    pub(crate) abort_strategy: AbortStrategy<T>,
    pub(crate) max_iter: usize,
    pub(crate) workers: Option<usize>,
    pub(crate) queue_capacity: Option<usize>,
    pub(crate) empty_cluster_policy: EmptyClusterPolicy,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_, _, _| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            abort_strategy: AbortStrategy::NoChange,
            max_iter: DEFAULT_MAX_ITER,
            workers: None,
            queue_capacity: None,
            empty_cluster_policy: EmptyClusterPolicy::KeepCentroid,
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }

    pub(crate) fn pass_settings(&self, sample_cnt: usize) -> PassSettings {
        let defaults = PassSettings::for_samples(sample_cnt);
        PassSettings {
            workers: self.workers.unwrap_or(defaults.workers),
            queue_capacity: self.queue_capacity.unwrap_or(defaults.queue_capacity),
        }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("abort_strategy", &self.abort_strategy)
            .field("max_iter", &self.max_iter)
            .field("workers", &self.workers)
            .field("queue_capacity", &self.queue_capacity)
            .field("empty_cluster_policy", &self.empty_cluster_policy)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each assignment pass during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used by the centroid chooser.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Set the abort-strategy to use during a running k-means calculation. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::NoChange`]
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Limit the amount of iterations. Reaching the limit is not an error, the returned
    /// [`KMeansState`] is just not marked as converged.
    /// ## Default
    /// [`DEFAULT_MAX_ITER`]
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter.max(1); self
    }
    /// Set the amount of workers per assignment pass.
    /// ## Default
    /// One per rayon thread, but never more than there are samples.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = Some(workers.max(1)); self
    }
    /// Set the capacity of the job and the result queue. Producer and workers block (backpressure)
    /// while their queue is full.
    /// ## Default
    /// Amount of samples, capped at 1024.
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.config.queue_capacity = Some(queue_capacity.max(1)); self
    }
    /// Set what happens with clusters that end up without any points.
    /// ## Default
    /// [`EmptyClusterPolicy::KeepCentroid`]
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.config.empty_cluster_policy = policy; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **distsum**: The total sum of squared distances from all samples to their respective centroids
/// - **centroids**: Calculated cluster centers, `k × cols`
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Each sample's nearest centroid and its squared distance to it
/// - **iterations**: Amount of assignment passes that were run
/// - **converged**: Whether the last pass left every sample in its cluster
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: Matrix<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: AssignmentMatrix<T>,
    pub iterations: usize,
    pub converged: bool,
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, centroids: Matrix<T>) -> Self {
        let k = centroids.rows();
        Self {
            k,
            distsum: T::infinity(),
            centroids,
            centroid_frequency: vec![0usize; k],
            assignments: AssignmentMatrix::new(sample_cnt),
            iterations: 0,
            converged: false,
        }
    }

    /// The assignments as `rows × 2` matrix: [centroid index, squared distance] per sample.
    pub fn assignment_matrix(&self) -> Matrix<T> {
        self.assignments.to_matrix()
    }
}


/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the point matrix you want to operate on. The primitive type
/// of the passed points will be the type used internaly for all calculations, as well as the result
/// as stored in the returned [`KMeansState`] structure. The points are only borrowed and never mutated,
/// so multiple runs can be done on the same data.
///
/// ## Supported centroid choosers
/// - Random points within the data's bounds [`crate::RandomCentroids`]
/// - Random sample (Forgy) [`crate::DataCentroids`]
/// - Points on an ellipse [`crate::EllipseCentroids`]
/// - K-Mean++ [`crate::KMeansPlusPlus`]
/// - Fixed centroids [`crate::PrecomputedCentroids`]
pub struct KMeans<'p, T: Primitive> {
    points: &'p Matrix<T>,
}
impl<'p, T: Primitive> KMeans<'p, T> {
    pub fn new(points: &'p Matrix<T>) -> Self {
        Self { points }
    }

    #[inline(always)]
    pub fn points(&self) -> &'p Matrix<T> {
        self.points
    }

    /// Lloyd-style k-means, with every assignment pass fanned out over a worker pool.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **chooser**: [`CentroidChooser`] used for the initialization of the **k** centroids
    /// - **measurer**: [`DistanceMeasurer`] pairing points with centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result).
    ///
    /// ## Example
    /// ```rust
    /// use kmeansp::*;
    ///
    /// let points = Matrix::from_vec(vec![0.0, 0.1, 0.2, 0.0, 9.8, 10.0, 10.1, 9.9], 4, 2).unwrap();
    /// let conf = KMeansConfig::build().workers(2).build();
    /// let result = KMeans::new(&points).kmeansp(2, &DataCentroids, &EuclideanDistance, &conf).unwrap();
    ///
    /// assert!(result.converged);
    /// assert_eq!(result.centroids.rows(), 2);
    /// assert_eq!(result.assignments.cluster(0), result.assignments.cluster(1));
    /// ```
    pub fn kmeansp<C, D>(&self, k: usize, chooser: &C, measurer: &D, config: &KMeansConfig<'_, T>) -> Result<KMeansState<T>>
    where
        C: CentroidChooser<T> + ?Sized,
        D: DistanceMeasurer<T> + ?Sized,
    {
        crate::variants::Lloyd::calculate(self, k, chooser, measurer, config)
    }
}

/// Cluster **points** into **k** clusters with the default configuration.
///
/// ## Returns
/// The final `k × cols` centroid matrix and the `rows × 2` assignment matrix
/// (column 0: centroid index, column 1: squared distance to that centroid).
pub fn kmeansp<T, C, D>(points: &Matrix<T>, k: usize, chooser: &C, measurer: &D) -> Result<(Matrix<T>, Matrix<T>)>
where
    T: Primitive,
    C: CentroidChooser<T> + ?Sized,
    D: DistanceMeasurer<T> + ?Sized,
{
    let state = KMeans::new(points).kmeansp(k, chooser, measurer, &KMeansConfig::default())?;
    let assignments = state.assignment_matrix();
    Ok((state.centroids, assignments))
}
