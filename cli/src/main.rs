mod cli;
mod file;
mod preferences;
mod report;

use std::process::ExitCode;

fn main() -> color_eyre::eyre::Result<ExitCode> {
    use clap::Parser;

    let args = cli::Args::parse();

    // Initialize logging.
    env_logger::builder().init();
    color_eyre::install()?;

    let prefs = preferences::load_preferences();
    cli::exec(args.subcommand, &prefs)
}
