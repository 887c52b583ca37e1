use std::process::ExitCode;

fn main() -> ExitCode {
    stockdesk_cli::logging::init_logging(&stockdesk_cli::logging::logging_config());
    stockdesk_cli::run()
}
