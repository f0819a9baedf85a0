//! Auth capability registry and resolution.

use std::collections::HashMap;

use zeroize::Zeroizing;

use crate::auth::descriptor::AuthDescriptor;
use crate::base::error::SessionError;

/// Credentials handed to an auth capability.
#[derive(Debug, Default)]
pub struct Credentials {
    pub username: Option<String>,
    /// Zeroized on drop.
    pub password: Option<Zeroizing<String>>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password: password.map(Zeroizing::new),
        }
    }
}

/// A ready-to-use credential produced by an auth capability.
pub trait AuthCredential {
    /// Value for the `Authorization` request header.
    fn header_value(&self) -> String;
}

/// A named authentication capability.
///
/// `auth_parse` declares that the capability consumes the raw credential
/// string as a `key:value` split; otherwise the raw string, or the stored
/// legacy username/password, reaches `build` untouched.
pub trait AuthProvider {
    fn auth_parse(&self) -> bool {
        true
    }

    fn build(
        &self,
        raw_auth: Option<&str>,
        credentials: Credentials,
    ) -> Result<Box<dyn AuthCredential>, SessionError>;
}

/// Name → capability registry.
pub struct AuthRegistry {
    providers: HashMap<String, Box<dyn AuthProvider>>,
}

impl AuthRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registry preloaded with the bundled `basic` and `bearer` schemes.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("basic", crate::auth::basic::BasicAuth);
        registry.register("bearer", crate::auth::bearer::BearerAuth);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, provider: impl AuthProvider + 'static) {
        self.providers.insert(name.into(), Box::new(provider));
    }

    pub fn get(&self, name: &str) -> Result<&dyn AuthProvider, SessionError> {
        self.providers
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| SessionError::UnknownAuthType(name.to_string()))
    }

    /// Reconstruct a usable credential from a stored descriptor.
    ///
    /// Descriptors with no recorded scheme resolve to `None`; an unknown
    /// scheme is fatal.
    pub fn resolve(
        &self,
        descriptor: &AuthDescriptor,
    ) -> Result<Option<Box<dyn AuthCredential>>, SessionError> {
        let Some(auth_type) = descriptor.auth_type() else {
            return Ok(None);
        };
        let provider = self.get(auth_type)?;

        match descriptor {
            AuthDescriptor::Raw { raw_auth, .. } => {
                let credentials = if provider.auth_parse() {
                    let (username, password) = parse_raw_credentials(raw_auth);
                    Credentials::new(username, password)
                } else {
                    Credentials::default()
                };
                provider.build(Some(raw_auth), credentials).map(Some)
            }
            AuthDescriptor::Legacy {
                username, password, ..
            } => {
                let credentials = Credentials::new(username.clone(), password.clone());
                provider.build(None, credentials).map(Some)
            }
            // auth_type() returned a scheme, so the descriptor is populated.
            AuthDescriptor::None => Ok(None),
        }
    }
}

impl Default for AuthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a raw credential string on the first unescaped `:`.
///
/// `\:` escapes a literal colon inside the username. A string with no
/// separator is a bare username with no password.
pub fn parse_raw_credentials(raw: &str) -> (Option<String>, Option<String>) {
    let mut username = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(':') => username.push(':'),
                Some(other) => {
                    username.push('\\');
                    username.push(other);
                }
                None => username.push('\\'),
            },
            ':' => return (Some(username), Some(chars.as_str().to_string())),
            _ => username.push(ch),
        }
    }
    (Some(username), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_credentials() {
        assert_eq!(
            parse_raw_credentials("user:pass"),
            (Some("user".to_string()), Some("pass".to_string()))
        );
        assert_eq!(
            parse_raw_credentials("user"),
            (Some("user".to_string()), None)
        );
        assert_eq!(
            parse_raw_credentials("user:"),
            (Some("user".to_string()), Some(String::new()))
        );
        // Only the first separator splits.
        assert_eq!(
            parse_raw_credentials("user:pa:ss"),
            (Some("user".to_string()), Some("pa:ss".to_string()))
        );
    }

    #[test]
    fn test_parse_raw_credentials_escaped_colon() {
        assert_eq!(
            parse_raw_credentials(r"do\:main\user:pass"),
            (Some(r"do:main\user".to_string()), Some("pass".to_string()))
        );
    }

    #[test]
    fn test_unknown_type_fails() {
        let registry = AuthRegistry::with_builtins();
        let descriptor = AuthDescriptor::Raw {
            auth_type: "kerberos".to_string(),
            raw_auth: "x".to_string(),
        };
        assert!(matches!(
            registry.resolve(&descriptor),
            Err(SessionError::UnknownAuthType(name)) if name == "kerberos"
        ));
    }

    #[test]
    fn test_typeless_descriptor_resolves_to_none() {
        let registry = AuthRegistry::with_builtins();
        assert!(registry.resolve(&AuthDescriptor::None).unwrap().is_none());
        let legacy = AuthDescriptor::Legacy {
            auth_type: None,
            username: Some("user".to_string()),
            password: None,
        };
        assert!(registry.resolve(&legacy).unwrap().is_none());
    }

    #[test]
    fn test_custom_provider_registration() {
        struct Static;
        struct StaticCredential;
        impl AuthCredential for StaticCredential {
            fn header_value(&self) -> String {
                "Static token".to_string()
            }
        }
        impl AuthProvider for Static {
            fn auth_parse(&self) -> bool {
                false
            }
            fn build(
                &self,
                _raw_auth: Option<&str>,
                _credentials: Credentials,
            ) -> Result<Box<dyn AuthCredential>, SessionError> {
                Ok(Box::new(StaticCredential))
            }
        }

        let mut registry = AuthRegistry::new();
        registry.register("static", Static);
        let descriptor = AuthDescriptor::Raw {
            auth_type: "static".to_string(),
            raw_auth: "ignored".to_string(),
        };
        let credential = registry.resolve(&descriptor).unwrap().unwrap();
        assert_eq!(credential.header_value(), "Static token");
    }
}
