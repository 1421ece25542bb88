use crate::stimulus::StimulusSpec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One planned presentation. Built by the sequence generator, consumed
/// read-only by the trial runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    /// Zero-based position in the generated sequence.
    pub index: usize,
    pub stimulus: StimulusSpec,
    /// Derived once at creation from the session target. The runner and
    /// scoring read this flag and never re-derive it from the stimulus.
    pub is_target: bool,
    /// Blank interval before the stimulus appears.
    pub isi: Duration,
}

impl Trial {
    pub fn new(index: usize, stimulus: StimulusSpec, target: StimulusSpec, isi: Duration) -> Self {
        Self {
            index,
            stimulus,
            is_target: stimulus == target,
            isi,
        }
    }

    /// One-based number used in marker labels and data rows.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Outcome of one resolved trial. Created exactly once, at response
/// window close; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial: Trial,
    pub responded: bool,
    pub reaction_time: Option<Duration>,
    pub correct: bool,
}

impl TrialResult {
    pub fn new(trial: Trial, reaction_time: Option<Duration>) -> Self {
        let responded = reaction_time.is_some();
        let correct = score(trial.is_target, responded);
        Self {
            trial,
            responded,
            reaction_time,
            correct,
        }
    }
}

/// Correctness rule: respond to targets, withhold for everything else.
/// Pure so a stored result can be re-scored and must agree.
pub fn score(is_target: bool, responded: bool) -> bool {
    is_target == responded
}
