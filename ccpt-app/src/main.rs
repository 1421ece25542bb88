mod app;
mod cli;
mod input;
mod sinks;
mod summary;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = cli::Args::parse();
    app::App::new(args).run()
}
