//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use relais_client::SessionGuard;
use relais_core::{ApiUrl, Credentials};

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email address to authenticate with
    #[arg(long)]
    pub mail: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// API base URL
    #[arg(long, default_value = "http://localhost:8000")]
    pub base_url: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let base = ApiUrl::new(&args.base_url).context("Invalid base URL")?;
    let guard = SessionGuard::new(base);

    eprintln!("{}", "Logging in...".dimmed());

    let user = guard
        .login(&Credentials::new(&args.mail, &args.password))
        .await
        .context("Failed to log in")?;

    // Save session
    storage::persist_guard(&guard)
        .await
        .context("Failed to save session")?;

    // Print success
    output::success("Logged in successfully");
    println!();
    output::field("User", &user.username);
    output::field("Mail", &user.mail);

    Ok(())
}
