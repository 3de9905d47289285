//! Main application entry point.

use clap::Parser;
use venueplan_app::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting VenuePlan");

    let cli = Cli::parse();
    let report = venueplan_app::run(&cli)?;
    log::info!(
        "Replayed {} steps: {} placed, {} deleted",
        report.steps,
        report.placed,
        report.deleted
    );
    Ok(())
}
