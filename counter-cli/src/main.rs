use clap::Parser;
use counter_cli::{cli::Cli, run, telemetry::setup_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_telemetry();
    run(Cli::parse()).await
}
