//! Whoami command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let guard = storage::load_guard()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'relais auth login' first.")?;

    let state = guard.check_auth().await;

    let Some(user) = state.user.filter(|_| state.is_authenticated) else {
        bail!("Session expired. Run 'relais auth login' again.");
    };

    // The check may have rotated the access token.
    storage::persist_guard(&guard)
        .await
        .context("Failed to save session")?;

    output::field("User", &user.username);
    output::field("Mail", &user.mail);
    output::field("Nom", &user.nom);
    output::field("Prenom", &user.prenom);

    Ok(())
}
