//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    // Logging out without a session is a no-op.
    if let Some(guard) = storage::load_guard().await? {
        guard.logout().await.context("Failed to log out")?;
    }

    storage::clear_session()
        .await
        .context("Failed to clear session file")?;

    output::success("Logged out");
    Ok(())
}
