use std::process::ExitCode;

fn main() -> ExitCode {
    match dailybot_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
