//! Basic access authentication capability.

use base64::{engine::general_purpose, Engine as _};
use zeroize::Zeroizing;

use crate::auth::registry::{AuthCredential, AuthProvider, Credentials};
use crate::base::error::SessionError;

/// The `basic` scheme: raw credentials are a `user:pass` pair, rendered
/// as a base64-encoded `Authorization` value.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicAuth;

impl AuthProvider for BasicAuth {
    fn build(
        &self,
        _raw_auth: Option<&str>,
        credentials: Credentials,
    ) -> Result<Box<dyn AuthCredential>, SessionError> {
        let Credentials { username, password } = credentials;
        let username = username.ok_or(SessionError::MissingAuthCredentials)?;
        Ok(Box::new(BasicCredential {
            username,
            password: password.unwrap_or_else(|| Zeroizing::new(String::new())),
        }))
    }
}

/// Resolved basic credentials.
pub struct BasicCredential {
    pub username: String,
    password: Zeroizing<String>,
}

impl BasicCredential {
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl AuthCredential for BasicCredential {
    fn header_value(&self) -> String {
        let creds = format!("{}:{}", self.username, *self.password);
        format!("Basic {}", general_purpose::STANDARD.encode(creds))
    }
}
