//! Runtime configuration for the book club store.
//!
//! Two values drive the store: the remote script endpoint (absent means the
//! local mirror is the only store) and an optional master-admin email.

use std::env;
use std::path::PathBuf;

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

pub const ENV_SCRIPT_URL: &str = "BOOKCLUB_SCRIPT_URL";
pub const ENV_MASTER_ADMIN_EMAIL: &str = "BOOKCLUB_MASTER_ADMIN_EMAIL";
pub const ENV_MIRROR_PATH: &str = "BOOKCLUB_MIRROR_PATH";

/// Store configuration resolved from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubConfig {
    /// Remote script endpoint; `None` runs in local-only mode.
    pub script_url: Option<String>,
    /// Email that is always treated as an administrator.
    pub master_admin_email: Option<String>,
    /// Override for the local mirror database location.
    pub mirror_path: Option<PathBuf>,
}

impl ClubConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        parse_config(|key| env::var(key).ok())
    }

    /// Replace the endpoint, validating it the same way as the environment value.
    pub fn with_script_url(mut self, url: Option<String>) -> Result<Self> {
        if let Some(url) = normalize_text_option(url) {
            self.script_url = Some(normalize_endpoint(url)?);
        }
        Ok(self)
    }

    /// Whether a remote endpoint is configured.
    pub const fn is_remote_enabled(&self) -> bool {
        self.script_url.is_some()
    }
}

/// Parse configuration through an arbitrary key lookup.
///
/// Public for testability so callers can resolve config without touching the
/// process environment.
pub fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<ClubConfig> {
    let script_url = normalize_text_option(lookup(ENV_SCRIPT_URL))
        .map(normalize_endpoint)
        .transpose()?;
    let master_admin_email =
        normalize_text_option(lookup(ENV_MASTER_ADMIN_EMAIL)).map(|email| email.to_lowercase());
    let mirror_path = normalize_text_option(lookup(ENV_MIRROR_PATH)).map(PathBuf::from);

    Ok(ClubConfig {
        script_url,
        master_admin_email,
        mirror_path,
    })
}

fn normalize_endpoint(value: String) -> Result<String> {
    if is_http_url(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!(
            "{ENV_SCRIPT_URL} must include http:// or https://"
        )))
    }
}
