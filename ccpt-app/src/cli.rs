use clap::Parser;
use std::path::PathBuf;

/// Visual continuous performance test. Press ENTER for the target
/// stimulus; type `q` then ENTER to abort the session.
#[derive(Parser, Debug)]
#[command(name = "ccpt", version)]
pub struct Args {
    /// Participant identifier used in output file names.
    #[arg(long)]
    pub participant: String,

    /// Session identifier used in output file names.
    #[arg(long, default_value = "1")]
    pub session: String,

    /// Number of main trials.
    #[arg(long, default_value_t = 10)]
    pub trials: usize,

    /// Number of practice trials (0 skips practice).
    #[arg(long, default_value_t = 15)]
    pub practice: usize,

    /// Seed for the trial sequence; omit for OS entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory that receives per-participant output folders.
    #[arg(long, default_value = "data", env = "CCPT_DATA_DIR")]
    pub data_dir: PathBuf,
}
