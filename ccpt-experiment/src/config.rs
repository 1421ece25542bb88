use ccpt_core::StimulusSpec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session parameters. Durations are wall-clock; presentation and grace
/// lengths are fixed per trial regardless of ISI or responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub practice_trials: usize,
    pub experiment_trials: usize,
    /// Visible presentation time for every stimulus.
    pub stimulus_duration: Duration,
    /// Post-offset window during which a response still counts
    /// (main trials only; practice uses the collapsed window).
    pub grace_period: Duration,
    /// Upper bound on input latency during waits.
    pub poll_interval: Duration,
    /// The combination that requires a response.
    pub target: StimulusSpec,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            practice_trials: 15,
            experiment_trials: 10,
            stimulus_duration: Duration::from_millis(200),
            grace_period: Duration::from_millis(500),
            poll_interval: Duration::from_millis(1),
            target: StimulusSpec::red_square(),
        }
    }
}
