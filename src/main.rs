use clap::Parser;
use flowdoc::cli::{self, commands, Args, CommandStatus};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let _logging = match flowdoc::logging::init(&args.command) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {:#}", err);
            None
        }
    };

    match cli::run(args) {
        Ok(CommandStatus::Success) => ExitCode::SUCCESS,
        Ok(CommandStatus::Failure) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %format!("{:#}", err), "command failed");
            eprintln!("{}", commands::describe_error(&err));
            ExitCode::FAILURE
        }
    }
}
