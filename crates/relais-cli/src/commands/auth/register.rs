//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use relais_client::SessionGuard;
use relais_core::{ApiUrl, RegisterForm};

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Last name
    #[arg(long)]
    pub nom: String,

    /// First name
    #[arg(long)]
    pub prenom: String,

    /// Email address
    #[arg(long)]
    pub mail: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Display name
    #[arg(long)]
    pub username: String,

    /// Gender
    #[arg(long)]
    pub genre: String,

    /// API base URL
    #[arg(long, default_value = "http://localhost:8000")]
    pub base_url: String,
}

pub async fn run(args: RegisterArgs) -> Result<()> {
    let base = ApiUrl::new(&args.base_url).context("Invalid base URL")?;
    let guard = SessionGuard::new(base);

    let form = RegisterForm {
        nom: args.nom,
        prenom: args.prenom,
        mail: args.mail,
        password: args.password,
        username: args.username,
        genre: args.genre,
    };

    eprintln!("{}", "Creating account...".dimmed());

    let user = guard
        .register(&form)
        .await
        .context("Failed to register")?;

    storage::persist_guard(&guard)
        .await
        .context("Failed to save session")?;

    output::success("Account created");
    println!();
    output::field("User", &user.username);
    output::field("Mail", &user.mail);

    Ok(())
}
