//! Search API credentials stored on disk
//!
//! Credentials live in a small JSON file (default `~/.sumo`) written by
//! `sumo-export configure` and readable only by the owning user.

use super::secret::{secret_string, SecretString};
use crate::domain::{Result, SumoError};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Access identity and secret for basic authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Access id or account email
    #[serde(alias = "email")]
    pub identity: String,

    /// Access key or password
    #[serde(alias = "password")]
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret_string(secret.into()),
        }
    }

    /// Read credentials from `path`
    ///
    /// # Errors
    ///
    /// Returns [`SumoError::Configuration`] if the file is missing, unreadable
    /// or does not contain both fields.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SumoError::Configuration(format!(
                "No credentials found at {}! Run `sumo-export configure` first",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SumoError::Configuration(format!(
                "Failed to read credentials file {}: {e}",
                path.display()
            ))
        })?;

        let credentials: Credentials = serde_json::from_str(&contents).map_err(|e| {
            SumoError::Configuration(format!(
                "Invalid credentials file {}: {e}. Run `sumo-export configure` to recreate it",
                path.display()
            ))
        })?;

        if credentials.identity.is_empty() || credentials.secret.expose_secret().is_empty() {
            return Err(SumoError::Configuration(format!(
                "Credentials file {} has an empty identity or secret",
                path.display()
            )));
        }

        Ok(credentials)
    }

    /// Write credentials to `path`, restricting permissions to the owner
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}
