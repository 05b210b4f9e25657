use thiserror::Error;

/// Errors that abort a whole batch run.
///
/// Per-row failures never surface here; they are counted in the
/// [`BatchSummary`](super::BatchSummary) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input table or writing the output table failed.
    #[error(transparent)]
    Table(#[from] crate::io::Error),

    /// Invalid batch or descriptor configuration.
    #[error(transparent)]
    Config(#[from] crate::shape::Error),

    /// A worker thread could not be started.
    #[error("failed to start worker threads: {0}")]
    Spawn(#[source] std::io::Error),
}
