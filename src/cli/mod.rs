//! CLI module for the docflow engine
//!
//! Subcommands:
//! - `node`: execute a node configuration over an envelope
//! - `validate`: check a node configuration for authoring mistakes
//! - `normalize-feedback`: migrate a stored feedback array into groups
//! - `infer`: run extraction on a document with an OpenAI-compatible provider

pub mod feedback;
pub mod infer;
pub mod node;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Docflow engine - decision nodes and feedback-steered document extraction
#[derive(Parser)]
#[command(name = "docflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute a node over an envelope
    Node(node::NodeArgs),

    /// Validate a node configuration
    Validate(validate::ValidateArgs),

    /// Normalize a stored feedback array into feedback groups
    NormalizeFeedback(feedback::NormalizeFeedbackArgs),

    /// Run inference on a document
    Infer(infer::InferArgs),
}

/// Load `.env`, configuration and logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);
    config
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
