//! Account command handlers

use anyhow::{anyhow, Context, Result};

use freshshelf_core::{DomainError, Store, User, WriteReport};

use crate::output::Output;

/// Register a new account
pub fn register(store: &Store, username: &str, password: &str, output: &Output) -> Result<()> {
    let users = store.users();
    let user = users
        .register(username, password)
        .context("Registration failed")?;
    warn_if_unsaved(users.last_report(), output);

    output.success(&format!("Registered {}. Log in to start tracking items.", user.username));
    Ok(())
}

/// Log in and remember the user
pub fn login(store: &Store, username: &str, password: &str, output: &Output) -> Result<()> {
    let user = store.users().login(username, password).map_err(|e| match e {
        DomainError::RecordNotFound(_) => anyhow!("Invalid username or password"),
        other => anyhow!(other),
    })?;

    output.success(&format!("Logged in as {}", user.username));
    Ok(())
}

pub fn logout(store: &Store, output: &Output) -> Result<()> {
    store.users().logout();
    output.success("Logged out");
    Ok(())
}

pub fn whoami(store: &Store, output: &Output) -> Result<()> {
    let user = store.users().current_user();
    output.print_user(user.as_ref());
    Ok(())
}

/// Warn when a change reached neither storage backend
pub fn warn_if_unsaved(report: Option<WriteReport>, output: &Output) {
    if report.is_some_and(|r| !r.is_persisted()) {
        output.warn("Storage is unavailable. This change will not be kept.");
    }
}

/// The logged-in user, or an error telling the caller to log in
pub fn require_user(store: &Store) -> Result<User> {
    store
        .users()
        .current_user()
        .ok_or_else(|| anyhow!("Not logged in. Run `freshshelf login <username> <password>` first."))
}
