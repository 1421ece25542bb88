use ccpt_core::{InputEvent, InputSource, Key};
use ccpt_timing::{HighPrecisionTimer, Timer};
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// Line-based keyboard input: a reader thread stamps each line as it
/// arrives and feeds a channel, so `poll` never blocks the trial loop.
/// Plain ENTER is the response key; `q` aborts.
pub struct StdinInput {
    rx: Receiver<InputEvent>,
}

impl StdinInput {
    pub fn spawn(timer: HighPrecisionTimer) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-input".to_owned())
            .spawn(move || {
                let stdin = io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    let at_ns = timer.now();
                    let key = match line.trim() {
                        "q" | "Q" | "quit" | "esc" => Key::Abort,
                        _ => Key::Response,
                    };
                    if tx.send(InputEvent { key, at_ns }).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self { rx })
    }
}

impl InputSource for StdinInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }
}
