//! Profile update command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use relais_core::ProfileUpdate;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// New last name
    #[arg(long)]
    pub nom: Option<String>,

    /// New first name
    #[arg(long)]
    pub prenom: Option<String>,

    /// New display name
    #[arg(long)]
    pub username: Option<String>,

    /// New email address
    #[arg(long)]
    pub mail: Option<String>,

    /// New gender
    #[arg(long)]
    pub genre: Option<String>,
}

pub async fn run(args: UpdateArgs) -> Result<()> {
    let update = ProfileUpdate {
        nom: args.nom,
        prenom: args.prenom,
        username: args.username,
        mail: args.mail,
        genre: args.genre,
    };

    if update.is_empty() {
        bail!("Nothing to update. Pass at least one field.");
    }

    let guard = storage::load_guard()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'relais auth login' first.")?;

    let user = guard
        .update_profile(&update)
        .await
        .context("Failed to update profile")?;

    storage::persist_guard(&guard)
        .await
        .context("Failed to save session")?;

    output::success("Profile updated");
    println!();
    output::field("User", &user.username);
    output::field("Mail", &user.mail);
    output::field("Nom", &user.nom);
    output::field("Prenom", &user.prenom);

    Ok(())
}
