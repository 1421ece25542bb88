use crate::cli::Args;
use crate::input::StdinInput;
use crate::sinks::{CsvResults, MarkerLog};
use crate::summary::print_summary;
use anyhow::{Context, Result};
use ccpt_experiment::{ExperimentConfig, Session, SessionStatus};
use ccpt_timing::HighPrecisionTimer;
use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const EXP_NAME: &str = "CCPT-V";

pub struct App {
    args: Args,
}

impl App {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    pub fn run(self) -> Result<()> {
        let config = ExperimentConfig {
            practice_trials: self.args.practice,
            experiment_trials: self.args.trials,
            ..ExperimentConfig::default()
        };

        let participant_dir = self.args.data_dir.join(format!("P{}", self.args.participant));
        fs::create_dir_all(&participant_dir).with_context(|| {
            format!("creating participant directory {}", participant_dir.display())
        })?;
        let base = self.output_base(&participant_dir);
        let csv_path = base.with_extension("csv");
        let marker_path = base.with_extension("markers.tsv");

        let timer = HighPrecisionTimer::new();
        let input = StdinInput::spawn(timer.clone()).context("starting stdin reader")?;
        let events = MarkerLog::create(&marker_path, timer.clone(), config.target.to_string())
            .with_context(|| format!("creating marker log {}", marker_path.display()))?;
        let results = CsvResults::create(&csv_path)
            .with_context(|| format!("creating data file {}", csv_path.display()))?;
        let rng = match self.args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            participant = %self.args.participant,
            session = %self.args.session,
            trials = config.experiment_trials,
            practice = config.practice_trials,
            "session starting"
        );

        let mut session = Session::new(config, timer, rng, events, input, results);
        let status = session.run().context("session failed")?;

        print_summary(session.results.records());
        let json_path = base.with_extension("json");
        let file = fs::File::create(&json_path)
            .with_context(|| format!("creating results dump {}", json_path.display()))?;
        serde_json::to_writer_pretty(file, session.results.records())
            .context("writing results dump")?;

        match status {
            SessionStatus::Completed => {
                info!(data = %csv_path.display(), markers = %marker_path.display(), "session complete");
            }
            SessionStatus::Aborted => {
                info!(resolved = session.results.records().len(), "session aborted");
            }
        }
        Ok(())
    }

    fn output_base(&self, participant_dir: &std::path::Path) -> PathBuf {
        let date_string = Local::now().format("%Y-%m-%d_%H-%M-%S");
        participant_dir.join(format!(
            "P{}_S{}_{EXP_NAME}_{date_string}",
            self.args.participant, self.args.session
        ))
    }
}
