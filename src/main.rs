use std::process::ExitCode;

use clap::Parser;
use multiplex::cli_args::{Cli, Commands};
use multiplex::commands::{run_expand, run_merge};
use multiplex::config::load_subcommand;

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Expand(args) => run_expand(&load_subcommand(&args)?)?,
        Commands::Merge(args) => run_merge(&load_subcommand(&args)?)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
