use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "chibisafe-client";

pub struct CredentialStore;

impl CredentialStore {
    /// Accounts are per server, so the same username on two instances
    /// gets two entries.
    fn account(server: &str, username: &str) -> String {
        format!("{}@{}", username, server)
    }

    fn entry(server: &str, username: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &Self::account(server, username))
            .context("Failed to create keyring entry")
    }

    /// Store a password in the OS keychain
    pub fn store(server: &str, username: &str, password: &str) -> Result<()> {
        Self::entry(server, username)?
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve the password for a username from the OS keychain
    pub fn get_password(server: &str, username: &str) -> Result<String> {
        Self::entry(server, username)?
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Delete stored credentials for a username
    pub fn delete(server: &str, username: &str) -> Result<()> {
        Self::entry(server, username)?
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check if credentials exist for a username
    pub fn has_credentials(server: &str, username: &str) -> bool {
        Self::entry(server, username)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}
