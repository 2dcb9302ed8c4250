//! User registry and session
//!
//! Users live as one ordered list under [`USERS_KEY`]. Every change rewrites
//! the whole list. Uniqueness of usernames is enforced here, not by storage.

use std::cell::Cell;

use tracing::{debug, info, warn};

use crate::error::{DomainError, DomainResult};
use crate::models::User;
use crate::storage::{AppStorage, WriteReport};

/// Storage key of the user list
pub const USERS_KEY: &str = "freshShelfUsers";

/// Storage key of the logged-in user
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Minimum length of usernames and passwords
pub const MIN_CREDENTIAL_LEN: usize = 3;

/// Typed access to the persisted user list
pub struct UserStore<'a> {
    storage: &'a AppStorage,
    loaded_version: Cell<Option<u64>>,
    last_report: Cell<Option<WriteReport>>,
}

impl<'a> UserStore<'a> {
    pub fn new(storage: &'a AppStorage) -> Self {
        Self {
            storage,
            loaded_version: Cell::new(None),
            last_report: Cell::new(None),
        }
    }

    /// Load every user; missing or unreadable data is an empty list
    pub fn load_all(&self) -> Vec<User> {
        self.loaded_version.set(Some(self.storage.version(USERS_KEY)));
        self.storage.get(USERS_KEY).unwrap_or_default()
    }

    /// Replace the stored user list
    pub fn save_all(&self, users: &[User]) -> WriteReport {
        let conflict = match self.loaded_version.get() {
            Some(loaded) => self.storage.version(USERS_KEY) != loaded,
            None => false,
        };
        if conflict {
            warn!(key = USERS_KEY, "collection changed since it was loaded");
        }

        let mut report = self.storage.set(USERS_KEY, users);
        if report.is_persisted() {
            self.storage.bump_version(USERS_KEY);
            self.loaded_version.set(Some(self.storage.version(USERS_KEY)));
        }
        report.conflict = conflict;
        if !report.is_persisted() {
            warn!(key = USERS_KEY, "change was not stored in any backend");
        }
        self.last_report.set(Some(report));
        report
    }

    /// Outcome of the most recent save through this store
    ///
    /// Lets callers of `register` tell whether the
    /// change actually reached a backend.
    pub fn last_report(&self) -> Option<WriteReport> {
        self.last_report.get()
    }

    /// Find a user by case-insensitive username
    pub fn find<'u>(users: &'u [User], username: &str) -> Option<&'u User> {
        users.iter().find(|u| u.has_username(username))
    }

    /// Register a new user
    ///
    /// Both fields are trimmed and must be at least three characters. The
    /// list is reloaded first so users registered by another session count
    /// toward the duplicate check.
    pub fn register(&self, username: &str, password: &str) -> DomainResult<User> {
        let (username, password) = validate_credentials(username, password)?;

        let mut users = self.load_all();
        if Self::find(&users, &username).is_some() {
            debug!(username = %username, "registration rejected: duplicate");
            return Err(DomainError::DuplicateUsername(username));
        }

        let user = User::new(username, password);
        users.push(user.clone());
        self.save_all(&users);

        info!(username = %user.username, total = users.len(), "registered user");
        Ok(user)
    }

    /// Check credentials against the latest stored list
    ///
    /// Usernames match case-insensitively, passwords exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> DomainResult<User> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() {
            return Err(DomainError::empty("username"));
        }
        if password.is_empty() {
            return Err(DomainError::empty("password"));
        }

        let users = self.load_all();
        debug!(candidates = users.len(), "authenticating");

        users
            .into_iter()
            .find(|u| u.has_username(username) && u.password == password)
            .ok_or_else(|| {
                debug!(username, "authentication failed");
                DomainError::RecordNotFound("User with these credentials".to_string())
            })
    }

    /// Authenticate and remember the user as logged in
    pub fn login(&self, username: &str, password: &str) -> DomainResult<User> {
        let user = self.authenticate(username, password)?;
        self.storage.set(CURRENT_USER_KEY, &user);
        info!(username = %user.username, "logged in");
        Ok(user)
    }

    /// Forget the logged-in user
    pub fn logout(&self) {
        self.storage.remove(CURRENT_USER_KEY);
    }

    /// The logged-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.storage.get(CURRENT_USER_KEY)
    }
}

fn validate_credentials(username: &str, password: &str) -> DomainResult<(String, String)> {
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() {
        return Err(DomainError::empty("username"));
    }
    if password.is_empty() {
        return Err(DomainError::empty("password"));
    }
    if username.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(DomainError::too_short("username", MIN_CREDENTIAL_LEN));
    }
    if password.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(DomainError::too_short("password", MIN_CREDENTIAL_LEN));
    }

    Ok((username.to_string(), password.to_string()))
}
