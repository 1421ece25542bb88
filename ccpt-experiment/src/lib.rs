pub mod config;
pub mod error;
pub mod runner;
pub mod sequence;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ExperimentConfig;
pub use error::{SequenceError, SessionError};
pub use runner::{ResponseWindow, TrialOutcome, TrialRunner};
pub use sequence::{ISI_CHOICES, generate};
pub use session::{Session, SessionStatus};
