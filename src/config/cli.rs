//! CLI argument parsing
//!
//! Every command takes a YAML config followed by optional `path value`
//! override pairs. Flags must come before the overrides.
//!
//! # Usage
//!
//! ```bash
//! metatrain show configs/protonet.yaml optimizer.lr 0.01 training.max_epoch 50
//! metatrain validate configs/protonet.yaml
//! metatrain schedule configs/protonet.yaml --epochs 20
//! metatrain prepare configs/protonet.yaml --save-dir ./save/_debug
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Metatrain: training support for few-shot learning
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "metatrain")]
#[command(version)]
#[command(about = "Resolve, validate and prepare few-shot training configurations")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the configuration with overrides applied
    Show(ShowArgs),

    /// Validate a configuration against the training schema
    Validate(ValidateArgs),

    /// Print the learning rate the configured scheduler produces per epoch
    Schedule(ScheduleArgs),

    /// Create the run directory, write the resolved config and start the log
    Prepare(PrepareArgs),
}

/// Arguments for the show command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ShowArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (yaml, json)
    #[arg(short, long, default_value = "yaml")]
    pub format: OutputFormat,

    /// Override pairs: KEY.PATH VALUE ...
    #[arg(
        value_name = "OPTS",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub opts: Vec<String>,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show a summary of the validated spec
    #[arg(short, long)]
    pub detailed: bool,

    /// Override pairs: KEY.PATH VALUE ...
    #[arg(
        value_name = "OPTS",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub opts: Vec<String>,
}

/// Arguments for the schedule command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ScheduleArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Number of epochs to print (defaults to training.max_epoch)
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override pairs: KEY.PATH VALUE ...
    #[arg(
        value_name = "OPTS",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub opts: Vec<String>,
}

/// Arguments for the prepare command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PrepareArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override the run directory (training.save_dir)
    #[arg(short, long)]
    pub save_dir: Option<PathBuf>,

    /// Remove an existing run directory without asking
    #[arg(long)]
    pub force: bool,

    /// Restrict visible GPUs (sets CUDA_VISIBLE_DEVICES)
    #[arg(long, value_name = "IDS")]
    pub gpu: Option<String>,

    /// Override pairs: KEY.PATH VALUE ...
    #[arg(
        value_name = "OPTS",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub opts: Vec<String>,
}

/// Output format for the show command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: yaml, json",
                s
            )),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
