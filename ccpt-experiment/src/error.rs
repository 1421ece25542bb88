use thiserror::Error;

/// Sequence generation failures. Generation is otherwise pure and total.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("trial count must be positive")]
    InvalidTrialCount,
}

/// Session-level failures. Collaborator outages are kept distinct so the
/// caller can tell which transport broke; the core never retries.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("event sink unavailable: {0}")]
    EventSink(#[source] std::io::Error),
    #[error("result sink write failed: {0}")]
    ResultSink(#[source] std::io::Error),
}
