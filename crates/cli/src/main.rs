use std::process::ExitCode;

fn main() -> ExitCode {
    primavent_cli::run()
}
