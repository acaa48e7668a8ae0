use thiserror::Error;

/// Errors that can end a k-means run (or the loading of its input).
///
/// Every variant is fatal to the current run; nothing is retried inside the engine.
#[derive(Error, Debug)]
pub enum KMeansError {
    /// Bad arguments: k out of range, empty point matrix, ragged or mis-sized rows.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A mean was requested over zero rows.
    #[error("cannot compute a centroid of an empty matrix")]
    EmptyInput,

    /// A recompute step found no points assigned to `cluster`.
    #[error("cluster {cluster} has no assigned points")]
    EmptyCluster { cluster: usize },

    /// The centroid chooser could not produce k centroids from the data.
    #[error("centroid chooser failed: {reason}")]
    ChooserFailure { reason: String },

    /// Assigning point `row` to a centroid failed inside a worker.
    #[error("worker failed on row {row}: {reason}")]
    WorkerFailure { row: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A line of a point file could not be parsed.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl KMeansError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        KMeansError::InvalidInput { reason: reason.into() }
    }

    pub(crate) fn chooser_failure(reason: impl Into<String>) -> Self {
        KMeansError::ChooserFailure { reason: reason.into() }
    }
}

/// Convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, KMeansError>;
