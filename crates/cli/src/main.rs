use std::process::ExitCode;

fn main() -> ExitCode {
    betastay_cli::run()
}
