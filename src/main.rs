//! `hintkit` - drive the keyboard hint engine against page fixtures.

mod cli;
mod config;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    cli::app::run().await
}
