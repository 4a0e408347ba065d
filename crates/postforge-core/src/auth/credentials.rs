use anyhow::{Context, Result};
use keyring::Entry;

/// Keychain service name for remembered accounts
const SERVICE_NAME: &str = "postforge";

/// Opt-in "remember me" storage for the login credential pair, backed by
/// the OS keychain. Only the CLI's `--remember` flow writes here; the
/// session token itself lives in [`super::SessionStore`].
pub struct CredentialStore;

impl CredentialStore {
    /// Remember the password for an account email in the OS keychain
    pub fn remember(email: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email).context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve the remembered password for an account email
    pub fn password_for(email: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, email).context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Forget the remembered password for an account email
    pub fn forget(email: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email).context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check whether an account email has a remembered password
    pub fn is_remembered(email: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, email) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}
