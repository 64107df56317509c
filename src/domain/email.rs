use secrecy::{ExposeSecret, Secret};
use std::hash::Hash;

use super::ValidationError;

/// A syntactically valid email address. Addresses are trimmed and compared
/// case-insensitively, since invitations are typed in by hand.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Hash for Email {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}

impl Eq for Email {}

impl Email {
    pub fn parse(s: Secret<String>) -> Result<Self, ValidationError> {
        let normalized = s.expose_secret().trim().to_lowercase();
        if !validator::validate_email(&normalized) {
            return Err(ValidationError::new(format!(
                "Invalid email address: {}",
                s.expose_secret()
            )));
        }

        Ok(Self(Secret::new(normalized)))
    }

    pub fn parse_str(s: &str) -> Result<Self, ValidationError> {
        Self::parse(Secret::new(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.expose_secret()
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
