use std::process::ExitCode;

use clap::Parser;
use expenses::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.init_tracing();

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
