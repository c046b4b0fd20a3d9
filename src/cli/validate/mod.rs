//! Validate command - reports authoring mistakes in a node configuration

use std::path::PathBuf;

use clap::Args;

use super::{bootstrap, read_json};
use crate::domain::node::{validate_node_config, NodeConfig};

/// Arguments for the validate command
#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Node configuration JSON file
    #[arg(long)]
    pub config: PathBuf,
}

/// Run the validate command
pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    bootstrap();

    let config: NodeConfig = read_json(&args.config)?;
    let errors = validate_node_config(&config);

    if errors.is_empty() {
        println!("{} node is valid", config.type_name());
        return Ok(());
    }

    for error in &errors {
        eprintln!("- {}", error);
    }

    anyhow::bail!(
        "{} node has {} problem(s)",
        config.type_name(),
        errors.len()
    )
}
