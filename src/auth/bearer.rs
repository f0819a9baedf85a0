//! Bearer token capability.

use crate::auth::registry::{AuthCredential, AuthProvider, Credentials};
use crate::base::error::SessionError;

/// The `bearer` scheme: the raw string is the token itself, no parsing.
#[derive(Debug, Default, Clone, Copy)]
pub struct BearerAuth;

impl AuthProvider for BearerAuth {
    fn auth_parse(&self) -> bool {
        false
    }

    fn build(
        &self,
        raw_auth: Option<&str>,
        _credentials: Credentials,
    ) -> Result<Box<dyn AuthCredential>, SessionError> {
        let token = raw_auth
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingAuthCredentials)?;
        Ok(Box::new(BearerCredential {
            token: token.to_string(),
        }))
    }
}

/// Resolved bearer token.
pub struct BearerCredential {
    token: String,
}

impl AuthCredential for BearerCredential {
    fn header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
