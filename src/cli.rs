use crate::commands;
use crate::commands::TurnOptions;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "promptdock",
    version,
    about = "Chat assistant CLI with persistent, summarized conversation context"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ContextArgs {
    /// Profile name from profiles.json5.
    #[arg(short, long, default_value = "programming")]
    profile: String,
    /// Files included as context (candidates for summarization).
    #[arg(short, long)]
    files: Vec<PathBuf>,
    /// Files always included whole, never summarized.
    #[arg(long = "no-summary-files")]
    no_summary_files: Vec<PathBuf>,
}

impl ContextArgs {
    fn into_options(self) -> TurnOptions {
        TurnOptions {
            profile: self.profile,
            files: self.files,
            no_summary_files: self.no_summary_files,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one prompt and print the assistant's reply.
    Ask {
        #[command(flatten)]
        context: ContextArgs,
        /// The prompt to send.
        question: String,
    },
    /// Interactive chat loop; type `exit` or `quit` to leave.
    Chat {
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Report per-category history and summary-ledger state.
    Status,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Ask { context, question } => commands::ask::run(&context.into_options(), &question),
        Command::Chat { context } => commands::chat::run(&context.into_options()),
        Command::Status => {
            let report = commands::status::run()?;
            print!("{}", report.render());
            if !report.ok {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
