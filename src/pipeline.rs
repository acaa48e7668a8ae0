//! The concurrent assignment phase of one k-means iteration.
//!
//! A single producer pushes one [`PairPointCentroidJob`] per point onto a bounded job queue.
//! A pool of workers drains it, pairs each point with its nearest centroid and pushes a
//! [`PairPointCentroidResult`] onto the result queue, signalling completion once the job queue
//! is exhausted. The awaiter counts those signals and then closes the result queue, which ends
//! the aggregator's drain loop. The aggregator is the only writer of the [`AssignmentMatrix`].
//!
//! All tasks run as scoped threads, so the centroid matrix is borrowed read-only for exactly one
//! pass and can only be recomputed after every task of the pass has been joined.

use crate::distances::DistanceMeasurer;
use crate::error::{KMeansError, Result};
use crate::helpers;
use crate::memory::{AssignmentMatrix, Matrix, Primitive};
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::trace;

/// Unit of work: pair point **row** of **points** against every row of **centroids**.
pub struct PairPointCentroidJob<'a, T: Primitive, D: ?Sized> {
    pub row: usize,
    pub points: &'a Matrix<T>,
    pub centroids: &'a Matrix<T>,
    pub measurer: &'a D,
}
impl<'a, T, D> PairPointCentroidJob<'a, T, D>
where
    T: Primitive,
    D: DistanceMeasurer<T> + ?Sized,
{
    #[inline(always)]
    pub fn point(&self) -> &'a [T] {
        self.points.row(self.row)
    }

    /// Find the nearest centroid. Ties go to the lowest centroid index.
    pub fn run(&self) -> PairPointCentroidResult<T> {
        let (row, point) = (self.row, self.point());
        if point.len() != self.centroids.cols() {
            return PairPointCentroidResult::Failed {
                row,
                reason: format!("point has {} coordinates, centroids have {}", point.len(), self.centroids.cols()),
            };
        }

        let mut best: Option<(usize, T)> = None;
        for (ci, centroid) in self.centroids.iter_rows().enumerate() {
            let sq_distance = self.measurer.squared_distance(point, centroid);
            if !sq_distance.is_finite() {
                return PairPointCentroidResult::Failed {
                    row,
                    reason: format!("distance to centroid {} is {}", ci, sq_distance),
                };
            }
            match best {
                Some((_, best_dist)) if best_dist <= sq_distance => {}
                _ => best = Some((ci, sq_distance)),
            }
        }
        match best {
            Some((centroid, sq_distance)) => PairPointCentroidResult::Assigned { row, centroid, sq_distance },
            None => PairPointCentroidResult::Failed { row, reason: "there are no centroids".to_string() },
        }
    }
}

/// Outcome of one [`PairPointCentroidJob`].
#[derive(Clone, Debug, PartialEq)]
pub enum PairPointCentroidResult<T: Primitive> {
    Assigned { row: usize, centroid: usize, sq_distance: T },
    Failed { row: usize, reason: String },
}

/// Sizing of one assignment pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassSettings {
    /// Amount of concurrently running workers
    pub workers: usize,
    /// Capacity of the job and the result queue
    pub queue_capacity: usize,
}
impl PassSettings {
    pub fn for_samples(sample_cnt: usize) -> Self {
        Self {
            workers: helpers::default_worker_count(sample_cnt),
            queue_capacity: helpers::default_queue_capacity(sample_cnt),
        }
    }
}

/// Push one job per point row, in row order, then close the job queue (by dropping **jobs**).
///
/// Blocks while the queue is full. Returns the amount of pushed jobs, which is less than the
/// amount of rows only if every worker hung up early.
pub fn add_pair_point_centroid_jobs<'a, T, D>(
    jobs: Sender<PairPointCentroidJob<'a, T, D>>, points: &'a Matrix<T>, centroids: &'a Matrix<T>, measurer: &'a D,
) -> usize
where
    T: Primitive,
    D: DistanceMeasurer<T> + ?Sized,
{
    let mut pushed = 0;
    for row in 0..points.rows() {
        if jobs.send(PairPointCentroidJob { row, points, centroids, measurer }).is_err() {
            break;
        }
        pushed += 1;
    }
    trace!(pushed, "job producer done");
    pushed
}

/// Worker loop: compute a result for every job until the job queue is closed and empty, then
/// signal completion on **done** exactly once. Returns the amount of processed jobs.
pub fn do_pair_point_centroid_jobs<'a, T, D>(
    worker_id: usize, done: Sender<usize>, jobs: Receiver<PairPointCentroidJob<'a, T, D>>,
    results: Sender<PairPointCentroidResult<T>>,
) -> usize
where
    T: Primitive,
    D: DistanceMeasurer<T> + ?Sized,
{
    let mut processed = 0;
    for job in jobs.iter() {
        processed += 1;
        if results.send(job.run()).is_err() {
            break; // aggregator is gone, nobody cares about the remaining jobs
        }
    }
    drop(results);
    // the awaiter may already be gone as well; the signal is still attempted exactly once
    let _ = done.send(worker_id);
    processed
}

/// Wait for **workers** completion signals, then close the result queue.
/// Returns the amount of received signals.
pub fn await_pair_point_centroid_completion<T: Primitive>(
    done: Receiver<usize>, workers: usize, results: Sender<PairPointCentroidResult<T>>,
) -> usize {
    let mut signaled = 0;
    while signaled < workers {
        match done.recv() {
            Ok(worker_id) => {
                trace!(worker_id, "worker done");
                signaled += 1;
            }
            Err(_) => break, // every worker dropped its sender without signalling (panicked)
        }
    }
    drop(results);
    signaled
}

/// Drain **results** until the queue is closed, writing every assignment into **assignments**.
///
/// ## Returns
/// - **Ok(true)** if at least one point changed its cluster (or was assigned for the first time)
/// - **Ok(false)** if the membership of every point stayed the same
/// - the first [`KMeansError::WorkerFailure`] seen, after the queue has been drained completely
pub fn assess_clusters<T: Primitive>(
    assignments: &mut AssignmentMatrix<T>, results: Receiver<PairPointCentroidResult<T>>,
) -> Result<bool> {
    let mut changed = false;
    let mut failure = None;
    for result in results.iter() {
        match result {
            PairPointCentroidResult::Assigned { row, centroid, sq_distance } => {
                changed |= assignments.record(row, centroid, sq_distance);
            }
            PairPointCentroidResult::Failed { row, reason } => {
                if failure.is_none() {
                    failure = Some(KMeansError::WorkerFailure { row, reason });
                }
            }
        }
    }
    match failure {
        Some(err) => Err(err),
        None => Ok(changed),
    }
}

/// Run one complete assignment phase: producer, worker pool and awaiter on scoped threads,
/// the aggregator on the calling thread. Returns whether any cluster membership changed.
pub fn assign_pass<T, D>(
    points: &Matrix<T>, centroids: &Matrix<T>, assignments: &mut AssignmentMatrix<T>, measurer: &D,
    settings: PassSettings,
) -> Result<bool>
where
    T: Primitive,
    D: DistanceMeasurer<T> + ?Sized,
{
    if assignments.len() != points.rows() {
        return Err(KMeansError::invalid_input(format!(
            "assignment matrix has {} rows, point matrix has {}", assignments.len(), points.rows()
        )));
    }
    let workers = settings.workers.max(1);
    let capacity = settings.queue_capacity.max(1);

    let (job_tx, job_rx) = bounded(capacity);
    let (result_tx, result_rx) = bounded(capacity);
    let (done_tx, done_rx) = bounded(workers);

    std::thread::scope(|s| {
        s.spawn(move || add_pair_point_centroid_jobs(job_tx, points, centroids, measurer));
        for worker_id in 0..workers {
            let (done, jobs, results) = (done_tx.clone(), job_rx.clone(), result_tx.clone());
            s.spawn(move || do_pair_point_centroid_jobs(worker_id, done, jobs, results));
        }
        drop(done_tx);
        drop(job_rx);
        s.spawn(move || await_pair_point_centroid_completion(done_rx, workers, result_tx));

        assess_clusters(assignments, result_rx)
    })
}
