use clap::Parser;
use flower_data_science::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run().await,
        Command::Train => cli::pipeline::train().await,
        Command::Evaluate => cli::pipeline::evaluate().await,
    }
}
