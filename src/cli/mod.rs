pub mod args;
pub mod commands;

pub use args::{ImportArgs, MigrateArgs, ValidateArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
CATALOG COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "flowdoc")]
#[command(version = crate::VERSION)]
#[command(about = "Maintain a catalog of documented n8n workflows")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: import generated metadata, migrate it to the latest schema, then validate the catalog."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Upgrade metadata.json files to the latest schema",
        long_about = "Migrate walks each metadata record through every registered schema version newer than its own, saving after each step.",
        after_help = "Examples:\n    flowdoc migrate\n    flowdoc migrate workflows/email/send-email --target 1.1.0\n    flowdoc migrate --list-versions"
    )]
    Migrate(MigrateArgs),
    #[command(
        about = "Check workflow folders for completeness and correctness",
        long_about = "Validate checks required files, JSON structure, metadata fields, optional JSON Schemas and README sections for every workflow folder.",
        after_help = "Example:\n    flowdoc validate --check-consistency"
    )]
    Validate(ValidateArgs),
    #[command(
        about = "Write generated metadata into a workflow folder",
        long_about = "Import parses generated metadata text, repairs values outside the catalog vocabulary, and writes it as metadata.json.",
        after_help = "Example:\n    flowdoc import workflows/email/send-email --from generated.txt"
    )]
    Import(ImportArgs),
}

/// Whether a command completed without reportable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}

impl CommandStatus {
    pub fn from_success(ok: bool) -> Self {
        if ok {
            CommandStatus::Success
        } else {
            CommandStatus::Failure
        }
    }
}

pub fn run(args: Args) -> crate::Result<CommandStatus> {
    match args.command {
        Command::Migrate(migrate_args) => commands::migrate(migrate_args),
        Command::Validate(validate_args) => commands::validate(validate_args),
        Command::Import(import_args) => commands::import(import_args),
    }
}
