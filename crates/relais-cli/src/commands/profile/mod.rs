//! Profile subcommand implementations.

mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Update profile fields
    Update(update::UpdateArgs),
}

pub async fn handle(cmd: ProfileCommand) -> Result<()> {
    match cmd.command {
        ProfileSubcommand::Update(args) => update::run(args).await,
    }
}
