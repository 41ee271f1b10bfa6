//! Binary entrypoint for the `taskspark` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    taskspark::logging::init();

    // Recording is handled in commands::dispatch via TASKSPARK_RECORD=<dir>.
    match taskspark::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
