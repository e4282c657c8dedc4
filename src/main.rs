use std::process::ExitCode;

use projectsync::ui::output;

fn main() -> ExitCode {
    match projectsync::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
