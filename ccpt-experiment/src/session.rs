//! Outer session driver: instructions, practice block, main block.
//! Trials run strictly one at a time; each is fully resolved before the
//! next starts, and main-block results go to the result sink in order.

use crate::config::ExperimentConfig;
use crate::error::SessionError;
use crate::runner::{ResponseWindow, TrialOutcome, TrialRunner};
use crate::sequence::generate;
use ccpt_core::{EventSink, InputSource, Key, ResultSink, SessionPhase};
use ccpt_timing::Timer;
use rand::Rng;
use tracing::{debug, info};

/// How the session ended. Abort is a controlled path, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Completed,
    Aborted,
}

pub struct Session<T, R, E, I, S>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
    E: EventSink,
    I: InputSource,
    S: ResultSink,
{
    pub config: ExperimentConfig,
    pub timer: T,
    pub rng: R,
    pub events: E,
    pub input: I,
    pub results: S,
}

impl<T, R, E, I, S> Session<T, R, E, I, S>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
    E: EventSink,
    I: InputSource,
    S: ResultSink,
{
    pub fn new(config: ExperimentConfig, timer: T, rng: R, events: E, input: I, results: S) -> Self {
        Self {
            config,
            timer,
            rng,
            events,
            input,
            results,
        }
    }

    /// Runs the whole session. Both sinks are closed before returning,
    /// on completion and on abort alike.
    pub fn run(&mut self) -> Result<SessionStatus, SessionError> {
        let status = self.drive();
        let events_closed = self.events.close().map_err(SessionError::EventSink);
        let results_closed = self.results.close().map_err(SessionError::ResultSink);
        let status = status?;
        events_closed?;
        results_closed?;
        Ok(status)
    }

    fn drive(&mut self) -> Result<SessionStatus, SessionError> {
        let mut phase = SessionPhase::default();

        self.emit("instructions_with_example_displayed")?;
        if !self.await_acknowledge(phase)? {
            return Ok(SessionStatus::Aborted);
        }
        self.emit("instructions_acknowledged")?;

        advance(&mut phase);
        if self.config.practice_trials > 0 {
            self.emit("practice_instructions_displayed")?;
            if !self.await_acknowledge(phase)? {
                return Ok(SessionStatus::Aborted);
            }
            self.emit("practice_start")?;
            let trials = generate(self.config.practice_trials, self.config.target, &mut self.rng)?;
            for trial in &trials {
                match self.run_trial(trial, phase)? {
                    TrialOutcome::Resolved(result) => {
                        // Practice outcomes inform the participant, not
                        // the data file.
                        debug!(trial = trial.number(), correct = result.correct, "practice trial");
                    }
                    TrialOutcome::Aborted => return Ok(SessionStatus::Aborted),
                }
            }
            self.emit("practice_complete")?;
        }

        advance(&mut phase);
        self.emit("main_instructions_displayed")?;
        if !self.await_acknowledge(phase)? {
            return Ok(SessionStatus::Aborted);
        }
        self.emit("main_experiment_start")?;
        let trials = generate(self.config.experiment_trials, self.config.target, &mut self.rng)?;
        for trial in &trials {
            match self.run_trial(trial, phase)? {
                TrialOutcome::Resolved(result) => {
                    info!(
                        trial = trial.number(),
                        responded = result.responded,
                        correct = result.correct,
                        "trial resolved"
                    );
                    self.results
                        .append(&result)
                        .map_err(SessionError::ResultSink)?;
                }
                TrialOutcome::Aborted => return Ok(SessionStatus::Aborted),
            }
        }
        self.emit("experiment_complete")?;

        Ok(SessionStatus::Completed)
    }

    fn run_trial(
        &mut self,
        trial: &ccpt_core::Trial,
        phase: SessionPhase,
    ) -> Result<TrialOutcome, SessionError> {
        let window = if phase.is_practice() {
            ResponseWindow::StimulusOnly
        } else {
            ResponseWindow::OffsetGrace(self.config.grace_period)
        };
        TrialRunner::new(
            &self.timer,
            &mut self.events,
            &mut self.input,
            self.config.stimulus_duration,
            self.config.poll_interval,
        )
        .run(trial, phase, window)
    }

    /// Blocks until the participant presses the response key, honoring
    /// abort. Returns false when the session should end.
    fn await_acknowledge(&mut self, phase: SessionPhase) -> Result<bool, SessionError> {
        loop {
            for event in self.input.poll() {
                match event.key {
                    Key::Abort => {
                        self.emit(phase.abort_label())?;
                        return Ok(false);
                    }
                    Key::Response => return Ok(true),
                }
            }
            self.timer.sleep(self.config.poll_interval);
        }
    }

    fn emit(&mut self, label: &str) -> Result<(), SessionError> {
        self.events.emit(label).map_err(SessionError::EventSink)
    }
}

fn advance(phase: &mut SessionPhase) {
    if let Some(next) = phase.next() {
        *phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedInput, VirtualTimer, ms};
    use ccpt_core::{StimulusSpec, Trial, TrialResult};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    const SEED: u64 = 7;

    fn config(practice: usize, main: usize) -> ExperimentConfig {
        ExperimentConfig {
            practice_trials: practice,
            experiment_trials: main,
            ..ExperimentConfig::default()
        }
    }

    fn probe_sequences(cfg: &ExperimentConfig) -> (Vec<Trial>, Vec<Trial>) {
        // Mirrors the session's generation order with the same seed.
        let mut rng = StdRng::seed_from_u64(SEED);
        let practice = if cfg.practice_trials > 0 {
            generate(cfg.practice_trials, cfg.target, &mut rng).unwrap()
        } else {
            Vec::new()
        };
        let main = generate(cfg.experiment_trials, cfg.target, &mut rng).unwrap();
        (practice, main)
    }

    fn run_session(
        cfg: ExperimentConfig,
        script: Vec<(u64, Key)>,
    ) -> (SessionStatus, Vec<String>, Vec<TrialResult>) {
        let timer = VirtualTimer::new();
        let input = ScriptedInput::new(&timer, script);
        let mut session = Session::new(
            cfg,
            timer,
            StdRng::seed_from_u64(SEED),
            Vec::new(),
            input,
            Vec::new(),
        );
        let status = session.run().unwrap();
        (status, session.events, session.results)
    }

    /// Full trial length with no response: ISI + presentation + grace.
    fn full_trial_ns(cfg: &ExperimentConfig, trial: &Trial) -> u64 {
        (trial.isi + cfg.stimulus_duration + cfg.grace_period).as_nanos() as u64
    }

    #[test]
    fn abort_during_fourth_trial_isi_keeps_three_results() {
        let cfg = config(0, 10);
        let (_, main) = probe_sequences(&cfg);

        // Acks at 1 ms and 2 ms put the main block start at t = 2 ms.
        let mut t = ms(2);
        for trial in &main[..3] {
            t += full_trial_ns(&cfg, trial);
        }
        // 100 ms into trial 4's ISI (every ISI is at least 400 ms).
        let script = vec![
            (ms(1), Key::Response),
            (ms(2), Key::Response),
            (t + ms(100), Key::Abort),
        ];

        let (status, events, results) = run_session(cfg, script);
        assert_eq!(status, SessionStatus::Aborted);
        assert_eq!(results.len(), 3);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.trial.index, i);
        }
        assert_eq!(events.last().unwrap(), "experiment_aborted");
        // Trial 4 opened its ISI but never resolved.
        assert!(events.iter().any(|l| l == "isi_4"));
        assert!(events.iter().all(|l| !l.starts_with("trial_resolved_4")));
    }

    #[test]
    fn completed_session_emits_markers_in_order() {
        let cfg = config(1, 1);
        let (practice, _) = probe_sequences(&cfg);

        // Practice runs with the collapsed window: ISI + 200 ms only.
        let practice_end =
            ms(2) + (practice[0].isi + cfg.stimulus_duration).as_nanos() as u64;
        let script = vec![
            (ms(1), Key::Response),
            (ms(2), Key::Response),
            (practice_end + ms(1), Key::Response),
        ];

        let (status, events, results) = run_session(cfg, script);
        assert_eq!(status, SessionStatus::Completed);
        assert_eq!(results.len(), 1);

        let expected_order = [
            "instructions_with_example_displayed",
            "instructions_acknowledged",
            "practice_instructions_displayed",
            "practice_start",
            "practice_isi_1",
            "practice_stim_1_",
            "practice_stim_offset_1",
            "practice_trial_resolved_1",
            "practice_complete",
            "main_instructions_displayed",
            "main_experiment_start",
            "isi_1",
            "stim_1_",
            "stim_offset_1",
            "trial_resolved_1",
            "experiment_complete",
        ];
        assert_eq!(events.len(), expected_order.len());
        for (label, prefix) in events.iter().zip(expected_order) {
            assert!(
                label.starts_with(prefix),
                "expected {label:?} to start with {prefix:?}"
            );
        }
    }

    #[test]
    fn abort_during_instructions_ends_before_any_trial() {
        let cfg = config(5, 5);
        let script = vec![(ms(1), Key::Abort)];
        let (status, events, results) = run_session(cfg, script);
        assert_eq!(status, SessionStatus::Aborted);
        assert!(results.is_empty());
        assert_eq!(
            events,
            vec!["instructions_with_example_displayed", "experiment_aborted"]
        );
    }

    #[test]
    fn zero_main_trials_is_a_sequence_error() {
        let timer = VirtualTimer::new();
        let input = ScriptedInput::new(&timer, vec![(ms(1), Key::Response), (ms(2), Key::Response)]);
        let mut session = Session::new(
            config(0, 0),
            timer,
            StdRng::seed_from_u64(SEED),
            Vec::<String>::new(),
            input,
            Vec::<TrialResult>::new(),
        );
        assert!(matches!(
            session.run(),
            Err(SessionError::Sequence(_))
        ));
    }

    #[test]
    fn responses_land_in_the_result_sink_in_trial_order() {
        let cfg = config(0, 10);
        let (_, main) = probe_sequences(&cfg);

        // Respond 100 ms after the first trial's onset, nothing after.
        let first_onset = ms(2) + main[0].isi.as_nanos() as u64;
        let script = vec![
            (ms(1), Key::Response),
            (ms(2), Key::Response),
            (first_onset + ms(100), Key::Response),
        ];

        let (status, _, results) = run_session(cfg, script);
        assert_eq!(status, SessionStatus::Completed);
        assert_eq!(results.len(), 10);
        assert_eq!(results[0].reaction_time, Some(Duration::from_millis(100)));
        assert_eq!(results[0].correct, results[0].trial.is_target);
        for result in &results[1..] {
            assert!(!result.responded);
            assert_eq!(result.correct, !result.trial.is_target);
        }
        let stimuli: Vec<StimulusSpec> = results.iter().map(|r| r.trial.stimulus).collect();
        let expected: Vec<StimulusSpec> = main.iter().map(|t| t.stimulus).collect();
        assert_eq!(stimuli, expected);
    }
}
