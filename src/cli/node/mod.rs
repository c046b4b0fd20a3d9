//! Node command - executes a single node and prints the outcome

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::{bootstrap, print_json, read_json};
use crate::domain::envelope::Envelope;
use crate::domain::node::{execute_node, NodeConfig};

/// Arguments for the node command
#[derive(Args, Clone)]
pub struct NodeArgs {
    /// Node configuration JSON file (tagged by `type`)
    #[arg(long)]
    pub config: PathBuf,

    /// Envelope JSON file; an empty envelope is used when omitted
    #[arg(long)]
    pub envelope: Option<PathBuf>,
}

/// Run the node command
pub async fn run(args: NodeArgs) -> anyhow::Result<()> {
    bootstrap();

    let config: NodeConfig = read_json(&args.config)?;
    let envelope: Envelope = match args.envelope {
        Some(ref path) => read_json(path)?,
        None => Envelope::default(),
    };

    let outcome = execute_node(envelope, &config);
    info!(node_type = config.type_name(), branch = ?outcome.branch, "Node executed");

    print_json(&outcome)
}
