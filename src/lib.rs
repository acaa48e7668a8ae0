//! # kmeansp - API documentation
//!
//! kmeansp is a small rust library for the calculation of k-means-clustering, where every
//! assignment pass is run as a pipeline of concurrent tasks.
//!
//! ## Design target
//! Each iteration pairs every point with its nearest centroid. Instead of a plain parallel loop,
//! this pairing is organized as a pipeline:
//! - a **producer** pushes one job per point into a bounded job queue,
//! - a pool of **workers** takes jobs, computes the nearest centroid and pushes results,
//! - an **awaiter** waits for every worker to finish, then closes the result queue,
//! - the **aggregator** (the calling thread) drains the results into the assignment matrix and
//!   notes whether any point changed its cluster.
//!
//! Once the result queue is closed, all centroids are recomputed as the mean of their members, and the
//! next pass starts. The run ends when a pass leaves every point in its cluster. The bounded queues give
//! backpressure, so a pass over a huge point set does not buffer all of its jobs at once.
//!
//! ## Supported centroid initializations
//! The outcome of each K-Means run depends on the initialization of its clusters. For a list of the
//! implemented [`CentroidChooser`]s, see [`KMeans`]. Closures can be used as choosers, too.
//!
//! ## Supported distance measures
//! - [`EuclideanDistance`]
//! - [`ManhattanDistance`]
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeansp::*;
//!
//! fn main() {
//!     let (sample_cnt, sample_dims, k) = (2000, 8, 4);
//!
//!     // Generate some random data
//!     let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//!     samples.iter_mut().for_each(|v| *v = rand::random());
//!     let points = Matrix::from_vec(samples, sample_cnt, sample_dims).unwrap();
//!
//!     // Calculate kmeans, using kmean++ as initialization-method
//!     let (centroids, assignments) = kmeansp(&points, k, &KMeansPlusPlus, &EuclideanDistance).unwrap();
//!
//!     println!("Centroids: {:?}", centroids);
//!     println!("Cluster-Assignments: {:?}", assignments);
//! }
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kmeansp::*;
//!
//! fn main() {
//!     let (sample_cnt, sample_dims, k) = (2000, 8, 4);
//!
//!     // Generate some random data
//!     let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//!     samples.iter_mut().for_each(|v| *v = rand::random());
//!     let points = Matrix::from_vec(samples, sample_cnt, sample_dims).unwrap();
//!
//!     let conf = KMeansConfig::build()
//!         .init_done(&|_| println!("Initialization completed."))
//!         .iteration_done(&|s, nr, new_distsum|
//!             println!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2}",
//!                 nr, s.distsum, new_distsum, s.distsum - new_distsum))
//!         .workers(4)
//!         .build();
//!
//!     let result = KMeans::new(&points).kmeansp(k, &DataCentroids, &EuclideanDistance, &conf).unwrap();
//!
//!     println!("Centroids: {:?}", result.centroids);
//!     println!("Converged after {} iterations: {}", result.iterations, result.converged);
//!     println!("Error: {}", result.distsum);
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct (or the [`kmeansp()`] shortcut using the default
//! configuration). The struct borrows a [`Matrix`] of points and is generic over its primitive type, which
//! is the type used for all calculations and results.
//!
//! Calling [`KMeans::kmeansp`] does not mutate the points, so multiple runs can be done on the same data.
//! Internally, a new instance of [`KMeansState`] is used to store the state (and finally the result) of a
//! K-Means calculation. Failures are reported as [`KMeansError`].
//!
//! The building blocks of a single assignment pass are public in [`pipeline`], the centroid mean
//! computation in [`compute_centroid`], and a loader for tab delimited point files in [`io`].
//!
//! ## Logging
//! The crate emits [`tracing`] events (pass summaries on `debug`, convergence on `info`, empty
//! clusters and iteration limits on `warn`). It never installs a subscriber itself.

#[macro_use] mod helpers;
mod error;
mod memory;
mod api;
mod variants;
mod inits;
mod distances;
mod recompute;
mod abort_strategy;
pub mod pipeline;
pub mod io;

pub use abort_strategy::AbortStrategy;
pub use api::{kmeansp, KMeans, KMeansConfig, KMeansConfigBuilder, KMeansState, DEFAULT_MAX_ITER};
pub use distances::{DistanceMeasurer, EuclideanDistance, ManhattanDistance};
pub use error::{KMeansError, Result};
pub use inits::{CentroidChooser, DataCentroids, EllipseCentroids, KMeansPlusPlus, PrecomputedCentroids, RandomCentroids};
pub use memory::{AssignmentMatrix, Matrix, Primitive};
pub use recompute::{compute_centroid, recompute_centroids, EmptyClusterPolicy};
