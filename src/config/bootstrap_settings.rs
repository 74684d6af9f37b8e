use std::env;
use std::fmt;

use crate::errors::InternalError;

/// Process-wide configuration, read once at startup.
pub struct BootstrapSettings {
    database_url: String,
    session_secret: String,
    password_pepper: String,
    bind_address: String,
}

impl BootstrapSettings {
    /// Load settings from environment variables.
    ///
    /// `SESSION_SECRET` and `PASSWORD_PEPPER` are required; the database
    /// defaults to a local SQLite file and the bind address to port 3000.
    pub fn from_env() -> Result<Self, InternalError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://gymdesk.db?mode=rwc".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| InternalError::config("SESSION_SECRET", "must be set"))?;
        if session_secret.len() < 32 {
            return Err(InternalError::config(
                "SESSION_SECRET",
                "must be at least 32 characters",
            ));
        }

        let password_pepper = env::var("PASSWORD_PEPPER")
            .map_err(|_| InternalError::config("PASSWORD_PEPPER", "must be set"))?;

        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            database_url,
            session_secret,
            password_pepper,
            bind_address,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("session_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("bind_address", &self.bind_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let settings = BootstrapSettings {
            database_url: "sqlite::memory:".to_string(),
            session_secret: "super-secret-session-signing-key".to_string(),
            password_pepper: "super-secret-pepper".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
        };

        let output = format!("{:?}", settings);
        assert!(output.contains("<redacted>"));
        assert!(!output.contains("super-secret-session-signing-key"));
        assert!(!output.contains("super-secret-pepper"));
    }
}
