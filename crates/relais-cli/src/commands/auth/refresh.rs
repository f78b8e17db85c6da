//! Refresh command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs) -> Result<()> {
    let guard = storage::load_guard()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'relais auth login' first.")?;

    if !guard.renew_credential().await {
        storage::clear_session().await.ok();
        bail!("Renewal failed. Run 'relais auth login' again.");
    }

    storage::persist_guard(&guard)
        .await
        .context("Failed to save session")?;

    output::success("Credentials renewed");
    Ok(())
}
