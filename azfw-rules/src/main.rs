use anyhow::Result;
use clap::Parser;

mod cli;
mod deploy_cmd;
mod export_cmd;
mod inspect_cmd;
mod validate_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => validate_cmd::run_validate(args),
        Command::Inspect(args) => inspect_cmd::run_inspect(args),
        Command::Deploy(args) => deploy_cmd::run_deploy(args),
        Command::Export(args) => export_cmd::run_export(args),
    }
}
