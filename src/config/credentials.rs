//! Account credentials.

use std::fmt;

use crate::core::BookingError;

/// Environment variable holding the account user name.
pub const USERNAME_ENV: &str = "SLOT_BOOKER_USERNAME";
/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "SLOT_BOOKER_PASSWORD";

/// Login credentials, passed explicitly into each run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account user name or email.
    pub username: String,
    password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The password. Kept out of `Debug` output.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Load credentials from the environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self, BookingError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary key lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, BookingError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let username = lookup(USERNAME_ENV)
            .ok_or_else(|| BookingError::Config(format!("{USERNAME_ENV} is not set")))?;
        let password = lookup(PASSWORD_ENV)
            .ok_or_else(|| BookingError::Config(format!("{PASSWORD_ENV} is not set")))?;
        let creds = Self::new(username, password);
        creds.validate().map_err(BookingError::Config)?;
        Ok(creds)
    }

    /// Reject blank values.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".into());
        }
        if self.password.is_empty() {
            return Err("password must not be empty".into());
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
