//! Per-trial state machine: Idle → IsiWait → StimulusOn → OffsetGrace →
//! Resolved. One instance drives one trial to resolution; the session
//! driver owns the outer loop.
//!
//! All deadlines are absolute wall-clock targets computed at phase entry
//! and compared against `timer.now()` in a poll loop, so cumulative
//! polling overhead cannot drift the schedule.

use crate::error::SessionError;
use ccpt_core::{EventSink, InputSource, Key, SessionPhase, Trial, TrialResult};
use ccpt_timing::Timer;
use std::time::Duration;
use tracing::debug;

/// Response-capture policy. Practice historically captured only during
/// the visible presentation; main trials keep capture open through a
/// post-offset grace period. The asymmetry is deliberate and kept
/// explicit here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseWindow {
    StimulusOnly,
    OffsetGrace(Duration),
}

impl ResponseWindow {
    fn grace(self) -> Duration {
        match self {
            ResponseWindow::StimulusOnly => Duration::ZERO,
            ResponseWindow::OffsetGrace(grace) => grace,
        }
    }
}

/// How one trial ended. An abort terminates the whole session; the
/// in-flight trial yields no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    Resolved(TrialResult),
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrialPhase {
    IsiWait,
    StimulusOn,
    OffsetGrace,
    Resolved,
}

pub struct TrialRunner<'a, T, E, I>
where
    T: Timer<Timestamp = u64>,
    E: EventSink,
    I: InputSource,
{
    timer: &'a T,
    events: &'a mut E,
    input: &'a mut I,
    stimulus_duration: Duration,
    poll_interval: Duration,
}

impl<'a, T, E, I> TrialRunner<'a, T, E, I>
where
    T: Timer<Timestamp = u64>,
    E: EventSink,
    I: InputSource,
{
    pub fn new(
        timer: &'a T,
        events: &'a mut E,
        input: &'a mut I,
        stimulus_duration: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            timer,
            events,
            input,
            stimulus_duration,
            poll_interval,
        }
    }

    /// Runs one trial to resolution. Emits lifecycle markers in state
    /// order: isi, onset, (response), offset, resolved.
    pub fn run(
        &mut self,
        trial: &Trial,
        phase: SessionPhase,
        window: ResponseWindow,
    ) -> Result<TrialOutcome, SessionError> {
        let prefix = phase.marker_prefix();
        let n = trial.number();

        debug!(trial = n, state = ?TrialPhase::IsiWait, isi_ms = trial.isi.as_millis() as u64, "trial start");
        self.emit(&format!("{prefix}isi_{n}"))?;
        let isi_deadline = self.timer.now() + trial.isi.as_nanos() as u64;
        if self.poll_until(isi_deadline, None, &mut None, false, trial, phase)? {
            return Ok(TrialOutcome::Aborted);
        }

        // Stimulus on: fixed-length presentation, capture opens now.
        let onset = self.timer.now();
        debug!(trial = n, state = ?TrialPhase::StimulusOn, at_ns = onset);
        let target_tag = if trial.is_target { "target" } else { "non_target" };
        self.emit(&format!(
            "{prefix}stim_{n}_{}_{}_{target_tag}",
            trial.stimulus.shape.label(),
            trial.stimulus.color.label(),
        ))?;
        let visible_until = onset + self.stimulus_duration.as_nanos() as u64;
        let window_close = visible_until + window.grace().as_nanos() as u64;
        let mut first_rt: Option<u64> = None;

        // Presentation never ends early, even once a response is in.
        if self.poll_until(
            visible_until,
            Some((onset, window_close)),
            &mut first_rt,
            false,
            trial,
            phase,
        )? {
            return Ok(TrialOutcome::Aborted);
        }

        debug!(trial = n, state = ?TrialPhase::OffsetGrace, at_ns = self.timer.now());
        self.emit(&format!("{prefix}stim_offset_{n}"))?;

        // Grace closes at its deadline or on the first qualifying
        // response, whichever comes first. With a response already
        // captured (or a collapsed practice window) it closes at once.
        if matches!(window, ResponseWindow::OffsetGrace(_))
            && first_rt.is_none()
            && self.poll_until(
                window_close,
                Some((onset, window_close)),
                &mut first_rt,
                true,
                trial,
                phase,
            )?
        {
            return Ok(TrialOutcome::Aborted);
        }

        let result = TrialResult::new(trial.clone(), first_rt.map(Duration::from_nanos));
        debug!(
            trial = n,
            state = ?TrialPhase::Resolved,
            responded = result.responded,
            correct = result.correct,
        );
        let rt_label = result
            .reaction_time
            .map(|rt| format!("{:.3}", rt.as_secs_f64()))
            .unwrap_or_else(|| "none".to_owned());
        self.emit(&format!(
            "{prefix}trial_resolved_{n}_resp-{}_rt-{rt_label}_{}",
            result.responded,
            if result.correct { "correct" } else { "incorrect" },
        ))?;
        Ok(TrialOutcome::Resolved(result))
    }

    /// Polls input until `deadline`, honoring abort everywhere and,
    /// when `window` is open, capturing the first qualifying response.
    /// The qualification bound is inclusive: an event stamped exactly at
    /// the window close still counts. Returns true on abort.
    fn poll_until(
        &mut self,
        deadline: u64,
        window: Option<(u64, u64)>,
        first_rt: &mut Option<u64>,
        stop_on_response: bool,
        trial: &Trial,
        phase: SessionPhase,
    ) -> Result<bool, SessionError> {
        loop {
            for event in self.input.poll() {
                match event.key {
                    Key::Abort => {
                        self.emit(phase.abort_label())?;
                        return Ok(true);
                    }
                    Key::Response => {
                        let Some((onset, close)) = window else {
                            continue;
                        };
                        if first_rt.is_none() && event.at_ns >= onset && event.at_ns <= close {
                            let rt = event.at_ns - onset;
                            *first_rt = Some(rt);
                            self.emit(&format!(
                                "{}response_{}_{:.3}",
                                phase.marker_prefix(),
                                trial.number(),
                                Duration::from_nanos(rt).as_secs_f64(),
                            ))?;
                        }
                    }
                }
            }
            if stop_on_response && first_rt.is_some() {
                return Ok(false);
            }
            let now = self.timer.now();
            if now >= deadline {
                return Ok(false);
            }
            let remaining = Duration::from_nanos(deadline - now);
            self.timer.sleep(remaining.min(self.poll_interval));
        }
    }

    fn emit(&mut self, label: &str) -> Result<(), SessionError> {
        self.events.emit(label).map_err(SessionError::EventSink)
    }
}
