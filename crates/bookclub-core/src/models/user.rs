//! Member identity model

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::coerce;
use crate::{Error, Result};

/// Display name used when no member has identified themselves
pub const GUEST_NAME: &str = "Guest";

/// The member acting in the current session.
///
/// Passed explicitly to every operation that attributes or authorizes work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
        }
    }

    /// Anonymous session with the placeholder name and no email
    pub fn guest() -> Self {
        Self::new(GUEST_NAME, "")
    }

    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }

    /// Check the name is present and the email, when given, looks like one.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("name is required".to_string()));
        }
        if self.has_email() && !is_valid_email(&self.email) {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::guest()
    }
}

/// Basic `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"))
        .is_match(email.trim())
}

/// Row shape of the remote `users` sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRow {
    #[serde(default, deserialize_with = "coerce::string")]
    pub email: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub last_active: Option<String>,
}
