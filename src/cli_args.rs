//! Command-line argument structures.
//!
//! Isolates clap derivations so `main.rs` stays focused on runtime logic.
//! Every subcommand struct also derives `OrthoConfig`, letting its options
//! come from `.multiplex.toml` and the environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::printer::{FieldOrder, KeyStyle, OutputFormat, OutputOptions};

/// Serde predicate keeping `false` CLI defaults from masking configured values.
#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skip_serializing_if predicates by reference"
)]
fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Parser, Debug)]
#[command(
    name = "multiplex",
    version,
    about = "Expand multi-value parameters into single-value run configurations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a flat list of multi-value parameters
    Expand(ExpandArgs),
    /// Merge common parameters into each set and expand every set
    Merge(MergeArgs),
}

/// Parameters accepted by the `expand` sub-command.
#[derive(Parser, Deserialize, Serialize, Default, Debug, OrthoConfig, Clone)]
#[command(name = "expand")]
#[ortho_config(prefix = "MULTIPLEX")]
pub struct ExpandArgs {
    /// JSON file with multi-value parameters; standard input when absent or `-`
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Check the document shape and report every problem before expanding
    #[arg(long)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub validate: bool,
    /// Output layout
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Key used for the chosen value of each assignment
    #[arg(long, value_enum)]
    pub keys: Option<KeyStyle>,
    /// Order of assignments inside each configuration
    #[arg(long, value_enum)]
    pub order: Option<FieldOrder>,
}

/// Parameters accepted by the `merge` sub-command.
#[derive(Parser, Deserialize, Serialize, Default, Debug, OrthoConfig, Clone)]
#[command(name = "merge")]
#[ortho_config(prefix = "MULTIPLEX")]
pub struct MergeArgs {
    /// JSON file with common parameters and sets; standard input when absent or `-`
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Check the document shape and report every problem before expanding
    #[arg(long)]
    #[serde(default, skip_serializing_if = "is_false")]
    pub validate: bool,
    /// Output layout
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Key used for the chosen value of each assignment
    #[arg(long, value_enum)]
    pub keys: Option<KeyStyle>,
    /// Order of assignments inside each configuration
    #[arg(long, value_enum)]
    pub order: Option<FieldOrder>,
}

/// Resolved options for one run, independent of the subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// `None` reads standard input.
    pub input: Option<PathBuf>,
    pub validate: bool,
    pub output: OutputOptions,
}

fn resolve_input(input: Option<&PathBuf>) -> Option<PathBuf> {
    input.filter(|path| path.as_os_str() != "-").cloned()
}

impl RunOptions {
    fn from_fields(
        input: Option<&PathBuf>,
        validate: bool,
        format: Option<OutputFormat>,
        keys: Option<KeyStyle>,
        order: Option<FieldOrder>,
    ) -> Self {
        Self {
            input: resolve_input(input),
            validate,
            output: OutputOptions {
                format: format.unwrap_or_default(),
                keys: keys.unwrap_or_default(),
                order: order.unwrap_or_default(),
            },
        }
    }
}

impl From<&ExpandArgs> for RunOptions {
    fn from(args: &ExpandArgs) -> Self {
        Self::from_fields(
            args.input.as_ref(),
            args.validate,
            args.format,
            args.keys,
            args.order,
        )
    }
}

impl From<&MergeArgs> for RunOptions {
    fn from(args: &MergeArgs) -> Self {
        Self::from_fields(
            args.input.as_ref(),
            args.validate,
            args.format,
            args.keys,
            args.order,
        )
    }
}
