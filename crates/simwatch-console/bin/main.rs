use clap::{Parser, Subcommand};
use eyre::Result;

mod cmd;

use cmd::console::ConsoleArgs;
use cmd::send::SendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "simwatch-console",
    version,
    about = "Test harness for the simwatch live updates WebSocket endpoint"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal UI: request form and live log
    Console(ConsoleArgs),
    /// Send requests non-interactively and print the session log
    Send(SendArgs),
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Console(args) => args.run(),
        Command::Send(args) => args.run(),
    }
}
