use clap::Parser;
use docflow_engine::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Node(args) => cli::node::run(args).await,
        Command::Validate(args) => cli::validate::run(args).await,
        Command::NormalizeFeedback(args) => cli::feedback::run(args).await,
        Command::Infer(args) => cli::infer::run(args).await,
    }
}
