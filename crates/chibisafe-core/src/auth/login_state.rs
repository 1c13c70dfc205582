use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::SessionClient;

use super::CredentialStore;

/// Key the login record is stored under
const LOGIN_STATE_FILE: &str = "login-informations.json";

/// What the client needs to resume a session after a restart.
///
/// The password is kept in the OS keychain, never in the state file.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginState {
    pub server: String,
    pub token: String,
    pub username: String,
    #[serde(skip)]
    pub password: Option<String>,
}

impl LoginState {
    pub fn new(
        server: impl Into<String>,
        token: impl Into<String>,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            server: server.into(),
            token: token.into(),
            username: username.into(),
            password,
        }
    }

    /// Rebuild the session client from the saved token and server
    pub fn to_client(&self, timeout: Duration) -> reqwest::Result<SessionClient> {
        SessionClient::with_timeout(self.token.clone(), self.server.clone(), timeout)
    }
}

impl fmt::Debug for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginState")
            .field("server", &self.server)
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// File-backed store for the single `LoginState` record.
pub struct LoginStore {
    data_dir: PathBuf,
    use_keychain: bool,
}

impl LoginStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            use_keychain: true,
        }
    }

    /// A store that never reads or writes the OS keychain
    pub fn without_keychain(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            use_keychain: false,
        }
    }

    /// Load the saved state, if any
    pub fn load(&self) -> Result<Option<LoginState>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read login state")?;
        let mut state: LoginState =
            serde_json::from_str(&contents).context("Failed to parse login state")?;

        if self.use_keychain {
            state.password = CredentialStore::get_password(&state.server, &state.username).ok();
        }

        debug!(server = %state.server, username = %state.username, "Loaded login state");
        Ok(Some(state))
    }

    /// Save state to disk, and the password to the keychain
    pub fn save(&self, state: &LoginState) -> Result<()> {
        let path = self.state_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        std::fs::write(&path, contents).context("Failed to write login state")?;

        if self.use_keychain {
            if let Some(ref password) = state.password {
                if let Err(e) = CredentialStore::store(&state.server, &state.username, password) {
                    warn!(error = %e, "Failed to store password");
                }
            }
        }
        Ok(())
    }

    /// Remove the saved state and its keychain entry
    pub fn clear(&self) -> Result<()> {
        if self.use_keychain {
            if let Ok(Some(state)) = self.load() {
                if CredentialStore::has_credentials(&state.server, &state.username) {
                    if let Err(e) = CredentialStore::delete(&state.server, &state.username) {
                        warn!(error = %e, "Failed to delete stored password");
                    }
                }
            }
        }

        let path = self.state_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove login state")?;
        }
        Ok(())
    }

    fn state_path(&self) -> PathBuf {
        self.data_dir.join(LOGIN_STATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LoginStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LoginStore::without_keychain(dir.path().join("nested"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_is_none() {
        let (_dir, store) = store();
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let (_dir, store) = store();
        let state = LoginState::new(
            "https://safe.example",
            "tok",
            "admin",
            Some("hunter2".to_string()),
        );
        store.save(&state).expect("save");

        let loaded = store.load().expect("load").expect("state present");
        assert_eq!(loaded.server, "https://safe.example");
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.username, "admin");
        assert!(loaded.password.is_none()); // never written to the file

        store.clear().expect("clear");
        assert!(store.load().expect("load").is_none());
        store.clear().expect("clearing twice is fine");
    }

    #[test]
    fn test_password_not_in_file() {
        let (dir, store) = store();
        let state = LoginState::new("s", "t", "u", Some("hunter2".to_string()));
        store.save(&state).expect("save");

        let contents = std::fs::read_to_string(dir.path().join("nested").join(LOGIN_STATE_FILE))
            .expect("state file");
        assert!(!contents.contains("hunter2"));
        assert!(!format!("{:?}", state).contains("hunter2"));
    }

    #[test]
    fn test_to_client() {
        let state = LoginState::new("https://safe.example", "tok", "admin", None);
        let client = state.to_client(Duration::from_secs(5)).expect("client");
        assert_eq!(client.token(), Some("tok"));
        assert_eq!(client.base_url(), "https://safe.example");

        let empty = LoginState::default()
            .to_client(Duration::from_secs(5))
            .expect("client");
        assert!(empty.token().is_none());
    }
}
