//! Configuration loading helpers.
//!
//! Wraps `ortho_config` so each subcommand's options are layered as
//! defaults < `.multiplex.toml` < environment < command line.

use ortho_config::{OrthoConfig, load_and_merge_subcommand_for};

use crate::MultiplexError;

/// Merge configuration file and environment values into `cli_args`.
///
/// # Errors
///
/// Returns [`MultiplexError::Config`] if a configuration source cannot be read
/// or does not match the subcommand's options.
pub fn load_subcommand<T>(cli_args: &T) -> Result<T, MultiplexError>
where
    T: OrthoConfig + serde::Serialize + Default + clap::CommandFactory + Clone,
{
    let merged = load_and_merge_subcommand_for::<T>(cli_args)?;
    Ok(merged)
}
