//! Persistent session cookies
//!
//! The search API hands out session cookies that let later requests skip
//! re-establishing a session. [`Session`] keeps them in memory and writes
//! them to a JSON file so the next run can pick them up again.

use crate::domain::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Cookie jar owned by the transport
///
/// The jar serves a single API endpoint, so it keys cookies by name only.
/// `Path`, `Domain` and `Expires` attributes are ignored and every stored
/// cookie goes out on every request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    path: Option<PathBuf>,
    cookies: BTreeMap<String, String>,
}

impl Session {
    /// A session that is never persisted
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the session stored at `path`
    ///
    /// A missing file starts an empty session. A file that can't be read or
    /// parsed is logged and ignored; it will be overwritten on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cookies = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(cookies) => cookies,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Ignoring unreadable cookie file"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read cookie file");
                BTreeMap::new()
            }
        };

        tracing::debug!(path = %path.display(), cookies = cookies.len(), "Loaded session");
        Self {
            path: Some(path),
            cookies,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the cookies to the session file, if there is one
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.cookies)?;
        fs::write(path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Merge `Set-Cookie` header values into the jar
    ///
    /// A cookie sent back with `Max-Age=0` is removed. Other attributes are
    /// dropped.
    pub fn absorb<'a>(&mut self, set_cookie_headers: impl IntoIterator<Item = &'a str>) {
        for header in set_cookie_headers {
            let mut parts = header.split(';');
            let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let expired = parts.any(|attr| attr.trim().eq_ignore_ascii_case("max-age=0"));
            if expired {
                self.cookies.remove(name);
            } else {
                self.cookies
                    .insert(name.to_string(), value.trim().to_string());
            }
        }
    }

    /// Value for the `Cookie` request header
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
