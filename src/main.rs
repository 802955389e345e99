use std::process::ExitCode;

use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<ExitCode> {
    let args = fsutils::cli::parse();
    Ok(if app::run(args)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
