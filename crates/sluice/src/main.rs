use std::process::ExitCode;

use clap::Parser;

use crate::cli::App;

mod cli;
mod logging;

fn main() -> ExitCode {
    let app = App::parse();

    if let Err(err) = logging::init(app.verbose) {
        eprintln!("warning: {err:#}");
    }

    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
