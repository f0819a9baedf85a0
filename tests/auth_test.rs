use serde_json::json;

use sessionjar::auth::{AuthDescriptor, AuthRegistry};
use sessionjar::Session;
use sessionjar::SessionError;

#[test]
fn test_basic_raw_auth_resolves_to_credentials() {
    let registry = AuthRegistry::with_builtins();
    let descriptor = AuthDescriptor::Raw {
        auth_type: "basic".to_string(),
        raw_auth: "user:pass".to_string(),
    };

    let credential = registry.resolve(&descriptor).unwrap().unwrap();
    // base64("user:pass")
    assert_eq!(credential.header_value(), "Basic dXNlcjpwYXNz");
}

#[test]
fn test_legacy_descriptor_resolves_same_as_raw() {
    let registry = AuthRegistry::with_builtins();
    let descriptor = AuthDescriptor::Legacy {
        auth_type: Some("basic".to_string()),
        username: Some("user".to_string()),
        password: Some("pass".to_string()),
    };

    let credential = registry.resolve(&descriptor).unwrap().unwrap();
    assert_eq!(credential.header_value(), "Basic dXNlcjpwYXNz");
}

#[test]
fn test_bearer_uses_raw_string_untouched() {
    let registry = AuthRegistry::with_builtins();
    let descriptor = AuthDescriptor::Raw {
        auth_type: "bearer".to_string(),
        raw_auth: "tok:en".to_string(),
    };

    // bearer does not parse raw credentials; the colon stays.
    let credential = registry.resolve(&descriptor).unwrap().unwrap();
    assert_eq!(credential.header_value(), "Bearer tok:en");
}

#[test]
fn test_bearer_without_token_fails() {
    let registry = AuthRegistry::with_builtins();
    let descriptor = AuthDescriptor::Raw {
        auth_type: "bearer".to_string(),
        raw_auth: "".to_string(),
    };
    assert!(matches!(
        registry.resolve(&descriptor),
        Err(SessionError::MissingAuthCredentials)
    ));
}

#[test]
fn test_unknown_auth_type_is_fatal() {
    let registry = AuthRegistry::with_builtins();
    let descriptor = AuthDescriptor::Raw {
        auth_type: "ntlm".to_string(),
        raw_auth: "x".to_string(),
    };
    assert!(matches!(
        registry.resolve(&descriptor),
        Err(SessionError::UnknownAuthType(_))
    ));
}

#[test]
fn test_empty_descriptor_resolves_to_none() {
    let registry = AuthRegistry::with_builtins();
    assert!(registry.resolve(&AuthDescriptor::None).unwrap().is_none());
}

#[test]
fn test_session_set_auth_shape_check() {
    let mut session = Session::new("/tmp/s.json", "s", "example.com");

    assert!(matches!(
        session.set_auth(&json!({"type": "basic"})),
        Err(SessionError::InvalidAuthDescriptor)
    ));
    assert!(matches!(
        session.set_auth(&json!({"type": "basic", "raw_auth": "u:p", "extra": true})),
        Err(SessionError::InvalidAuthDescriptor)
    ));

    session
        .set_auth(&json!({"type": "basic", "raw_auth": "u:p"}))
        .unwrap();

    let registry = AuthRegistry::with_builtins();
    let credential = session.auth(&registry).unwrap().unwrap();
    assert!(credential.header_value().starts_with("Basic "));
}
