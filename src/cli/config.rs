use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Check that the hint settings can produce labels and styles
    Validate,
}

pub fn cmd_config(args: ConfigArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Show => emit(output, ctx.config(), |config| {
            println!("Current configuration ({}):", ctx.config_path().display());
            match serde_yaml::to_string(config) {
                Ok(yaml) => print!("{yaml}"),
                Err(err) => println!("<unprintable: {err}>"),
            }
        }),
        ConfigAction::Validate => {
            ctx.config()
                .hints
                .validate()
                .with_context(|| format!("validating {}", ctx.config_path().display()))?;
            println!("Configuration {} is valid", ctx.config_path().display());
            Ok(())
        }
    }
}
