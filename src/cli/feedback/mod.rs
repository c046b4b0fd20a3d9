//! Normalize-feedback command - migrates stored feedback into groups

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use tracing::info;

use super::{bootstrap, print_json, read_json};
use crate::domain::feedback::{is_grouped_shape, normalize_feedbacks};

/// Arguments for the normalize-feedback command
#[derive(Args, Clone)]
pub struct NormalizeFeedbackArgs {
    /// JSON file holding the stored feedback array
    #[arg(long)]
    pub input: PathBuf,
}

/// Run the normalize-feedback command
pub async fn run(args: NormalizeFeedbackArgs) -> anyhow::Result<()> {
    bootstrap();

    let raw: Vec<Value> = read_json(&args.input)?;
    let groups = normalize_feedbacks(&raw);

    info!(
        entries = raw.len(),
        groups = groups.len(),
        already_grouped = is_grouped_shape(&raw),
        "Feedback normalized"
    );

    print_json(&groups)
}
