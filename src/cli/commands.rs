use clap::Subcommand;

use super::config::ConfigArgs;
use super::labels::LabelsArgs;
use super::run::RunArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Print the labels generated for a number of candidates
    Labels(LabelsArgs),

    /// Show hints on a page fixture and feed it a key sequence
    Run(RunArgs),

    /// Inspect the effective configuration
    Config(ConfigArgs),

    /// Show build and configuration information
    Info,
}
