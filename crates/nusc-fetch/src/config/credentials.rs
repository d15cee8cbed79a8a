//! Identity-provider credentials.

use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured username.
pub const ENV_USERNAME: &str = "NUSC_USERNAME";
/// Environment variable overriding the configured password.
pub const ENV_PASSWORD: &str = "NUSC_PASSWORD";

/// Username/password pair for the identity service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read credentials from the environment, if both variables are set.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var(ENV_USERNAME).ok()?;
        let password = std::env::var(ENV_PASSWORD).ok()?;
        Some(Self { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_construction() {
        let creds = Credentials::new("user", "pass");
        assert_eq!(creds.username, "user");
        assert_eq!(creds.password, "pass");
    }
}
