//! Session storage for persisting login state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use relais_client::SessionGuard;

use super::StoredSession;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "relais").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save a session to disk.
pub async fn save_session(stored: &StoredSession) -> Result<()> {
    let path = session_path()?;
    let json = serde_json::to_string_pretty(stored)?;

    fs::write(&path, &json).context("Failed to write session file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Capture and save the guard's current credentials and state.
pub async fn persist_guard(guard: &SessionGuard) -> Result<()> {
    save_session(&StoredSession::capture(guard)).await
}

/// Load a session from disk.
pub async fn load_session() -> Result<Option<StoredSession>> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    Ok(Some(stored))
}

/// Rebuild a guard from the session file, restoring its persisted state.
pub async fn load_guard() -> Result<Option<SessionGuard>> {
    let Some(stored) = load_session().await? else {
        return Ok(None);
    };

    let guard = stored.into_guard()?;
    if let Err(e) = guard.restore().await {
        tracing::warn!(error = %e, "Failed to restore session state, continuing without it");
    }

    Ok(Some(guard))
}

/// Clear the stored session.
pub async fn clear_session() -> Result<()> {
    let path = session_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove session file")?;
    }

    Ok(())
}
