//! The three narrow interfaces the task core talks through. Concrete
//! transports (marker log file, stdin reader, CSV writer) live in the
//! application crate.

use crate::trial::TrialResult;
use std::io;

/// Participant inputs the runner distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// The designated target-response input (space in the original task).
    Response,
    /// Cancels the whole session from any state.
    Abort,
}

/// A keypress with its capture timestamp, in the session timer's
/// nanosecond domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub at_ns: u64,
}

/// Timestamped lifecycle marker stream. Labels are opaque here; only
/// their ordering relative to state transitions is the contract.
/// Implementations must not block the trial runner.
pub trait EventSink {
    fn emit(&mut self, label: &str) -> io::Result<()>;

    /// Flush and release the transport. Called on completion and on abort.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Non-blocking input. Returns every event captured since the previous
/// poll, oldest first.
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Append-only consumer of resolved trials, called exactly once per
/// trial, in trial order.
pub trait ResultSink {
    fn append(&mut self, result: &TrialResult) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory sinks for tests and headless use.
impl EventSink for Vec<String> {
    fn emit(&mut self, label: &str) -> io::Result<()> {
        self.push(label.to_owned());
        Ok(())
    }
}

impl ResultSink for Vec<TrialResult> {
    fn append(&mut self, result: &TrialResult) -> io::Result<()> {
        self.push(result.clone());
        Ok(())
    }
}
