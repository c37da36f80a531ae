//! Login credentials for the portal.

use std::fmt;

/// Tenant subdomain plus the account used to log in through the web UI.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub subdomain: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        subdomain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: subdomain.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Names of the fields that are empty (after trimming).
    ///
    /// An empty list means the credentials are usable.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.subdomain.trim().is_empty() {
            missing.push("subdomain");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.password.trim().is_empty() {
            missing.push("password");
        }
        missing
    }

    /// Whether every field is non-empty.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

// Keep the password out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("subdomain", &self.subdomain)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_credentials() {
        let creds = Credentials::new("acme", "alice", "secret");
        assert!(creds.is_complete());
        assert!(creds.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields_are_listed_in_order() {
        let creds = Credentials::new("acme", "  ", "");
        assert_eq!(creds.missing_fields(), vec!["username", "password"]);
        assert!(!creds.is_complete());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("acme", "alice", "hunter2");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
