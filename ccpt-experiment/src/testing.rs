//! Deterministic doubles for the timer and input source: virtual time
//! advances only when the code under test sleeps, and scripted input
//! events become visible once virtual time reaches their timestamp.

use ccpt_core::{InputEvent, InputSource, Key};
use ccpt_timing::Timer;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub fn ms(v: u64) -> u64 {
    v * 1_000_000
}

#[derive(Debug, Clone, Default)]
pub struct VirtualTimer(Arc<AtomicU64>);

impl VirtualTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for VirtualTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }

    fn sleep(&self, d: Duration) {
        self.0.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

pub struct ScriptedInput {
    timer: VirtualTimer,
    pending: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(timer: &VirtualTimer, mut script: Vec<(u64, Key)>) -> Self {
        script.sort_by_key(|(at_ns, _)| *at_ns);
        Self {
            timer: timer.clone(),
            pending: script
                .into_iter()
                .map(|(at_ns, key)| InputEvent { key, at_ns })
                .collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        let now = self.timer.now();
        let mut due = Vec::new();
        while let Some(event) = self.pending.front() {
            if event.at_ns <= now {
                due.push(self.pending.pop_front().expect("front checked"));
            } else {
                break;
            }
        }
        due
    }
}
