use anyhow::Result;

use super::config::cmd_config;
use super::context::CliContext;
use super::env::CliArgs;
use super::info::cmd_info;
use super::labels::cmd_labels;
use super::run::cmd_run;
use crate::cli::commands::Commands;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Labels(args) => cmd_labels(args, ctx, cli.output),
        Commands::Run(args) => cmd_run(args, ctx, cli.output).await,
        Commands::Config(args) => cmd_config(args, ctx, cli.output),
        Commands::Info => cmd_info(ctx),
    }
}
