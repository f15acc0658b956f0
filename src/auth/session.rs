use error_stack::{Report, Result, ResultExt};
use thiserror::Error;

use super::{Directory, SessionStorage};
use crate::schema::User;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Could not save the session")]
    Storage,
}

/// The signed in user of the terminal client.
///
/// A session starts out loading until [`Session::init`] restores any
/// previously saved user from its storage. Only the public user data is
/// ever written to storage.
#[derive(Debug)]
pub struct Session {
    storage: Box<dyn SessionStorage>,
    directory: &'static Directory,
    user: Option<User>,
    loading: bool,
}

impl Session {
    #[must_use]
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self::with_directory(storage, Directory::demo())
    }

    #[must_use]
    pub fn with_directory(storage: Box<dyn SessionStorage>, directory: &'static Directory) -> Self {
        Self {
            storage,
            directory,
            user: None,
            loading: true,
        }
    }

    /// Restores the saved user, if any.
    ///
    /// Unreadable or corrupt session data is logged and removed; the
    /// session then starts signed out.
    #[tracing::instrument(skip_all, name = "session.init")]
    pub fn init(&mut self) {
        self.user = match self.storage.load() {
            Ok(Some(data)) => match serde_json::from_str::<User>(&data) {
                Ok(user) => Some(user),
                Err(error) => {
                    tracing::error!(%error, "failed to parse stored user");
                    if let Err(report) = self.storage.clear() {
                        tracing::warn!(error = ?report, "failed to remove stored user");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(report) => {
                tracing::error!(error = ?report, "failed to load stored user");
                None
            }
        };
        self.loading = false;

        if let Some(user) = &self.user {
            tracing::debug!(user.id = %user.id, "restored session");
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[tracing::instrument(skip(self, password))]
    pub fn login(&mut self, username: &str, password: &str) -> Result<&User, LoginError> {
        let Some(user) = self.directory.authenticate(username, password) else {
            return Err(Report::new(LoginError::InvalidCredentials));
        };

        let data = serde_json::to_string(user).change_context(LoginError::Storage)?;
        self.storage
            .save(&data)
            .change_context(LoginError::Storage)?;

        tracing::info!(user.id = %user.id, "logged in");
        Ok(self.user.insert(user.clone()))
    }

    pub fn logout(&mut self) -> Result<(), LoginError> {
        if let Some(user) = self.user.take() {
            tracing::info!(user.id = %user.id, "logged out");
        }
        self.storage.clear().change_context(LoginError::Storage)
    }

    /// Ends the session for this run. The saved user stays in storage.
    pub fn teardown(self) {
        tracing::debug!(signed_in = self.user.is_some(), "session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStorage, DEMO_PASSWORD};
    use crate::schema::Role;

    fn session(storage: &MemoryStorage) -> Session {
        let mut session = Session::new(Box::new(storage.clone()));
        session.init();
        session
    }

    #[test]
    fn should_load_before_init() {
        let session = Session::new(Box::new(MemoryStorage::new()));
        assert!(session.is_loading());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn should_persist_user_without_password() {
        let storage = MemoryStorage::new();
        let mut first = session(&storage);
        assert!(!first.is_loading());

        let user = first.login("editor", DEMO_PASSWORD).unwrap();
        assert_eq!(user.name, "Eddie Tor");

        let data = storage.data().unwrap();
        assert!(!data.contains(DEMO_PASSWORD));
        assert!(!data.contains("password"));
        first.teardown();

        let second = session(&storage);
        let user = second.current_user().unwrap();
        assert_eq!(user.username, "editor");
        assert_eq!(user.role, Role::Editor);
    }

    #[test]
    fn should_reject_invalid_credentials() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        let error = session.login("editor", "letmein").unwrap_err();
        assert!(matches!(
            error.current_context(),
            LoginError::InvalidCredentials
        ));
        assert!(session.current_user().is_none());
        assert!(storage.data().is_none());
    }

    #[test]
    fn should_drop_corrupt_session_data() {
        let storage = MemoryStorage::with_data("{ not json");
        let session = session(&storage);

        assert!(session.current_user().is_none());
        assert!(!session.is_loading());
        assert!(storage.data().is_none());
    }

    #[test]
    fn should_clear_storage_on_logout() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);

        session.login("admin", DEMO_PASSWORD).unwrap();
        session.logout().unwrap();
        assert!(session.current_user().is_none());
        assert!(storage.data().is_none());
    }
}
