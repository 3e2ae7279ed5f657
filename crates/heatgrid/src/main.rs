//! `heatgrid` command-line entry point.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn setup_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    setup_logging(cli.log_level);

    let config = cli.solver_config();
    tracing::debug!(?config, "parsed arguments");

    match heatgrid::run(&config) {
        Ok(report) => {
            println!("{}", report.data_line());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("heatgrid: {e}");
            ExitCode::FAILURE
        }
    }
}
