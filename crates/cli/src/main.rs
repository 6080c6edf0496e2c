use std::process::ExitCode;

fn main() -> ExitCode {
    slackcli_cli::run()
}
