use serde_json::{Map, Value};

use crate::base::error::SessionError;

/// Stored authentication choice.
///
/// At most one of the two populated forms is present. The legacy stanza
/// keeps username and password in clear on disk; the current stanza keeps
/// a single opaque string interpreted by the named capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthDescriptor {
    /// No auth recorded.
    #[default]
    None,
    /// Legacy stanza: `{"type": ..., "username": ..., "password": ...}`.
    Legacy {
        auth_type: Option<String>,
        username: Option<String>,
        password: Option<String>,
    },
    /// Current stanza: `{"type": ..., "raw_auth": ...}`.
    Raw { auth_type: String, raw_auth: String },
}

impl AuthDescriptor {
    /// Scheme name, when one is recorded.
    pub fn auth_type(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Legacy { auth_type, .. } => auth_type.as_deref(),
            Self::Raw { auth_type, .. } => Some(auth_type),
        }
    }

    /// Decode the persisted `auth` field. An absent or unrecognized
    /// stanza falls back to the empty descriptor.
    pub fn from_value(raw: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = raw else {
            return Self::None;
        };
        let auth_type = map
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string);

        if let Some(raw_auth) = map.get("raw_auth").and_then(Value::as_str) {
            if let Some(auth_type) = auth_type {
                return Self::Raw {
                    auth_type,
                    raw_auth: raw_auth.to_string(),
                };
            }
            return Self::None;
        }

        let username = map
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string);
        let password = map
            .get("password")
            .and_then(Value::as_str)
            .map(str::to_string);
        if auth_type.is_none() && username.is_none() && password.is_none() {
            return Self::None;
        }
        Self::Legacy {
            auth_type,
            username,
            password,
        }
    }

    /// Encode back to the persisted `auth` field. The empty descriptor
    /// serializes as the historical all-null trio.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match self {
            Self::None => {
                map.insert("type".to_string(), Value::Null);
                map.insert("username".to_string(), Value::Null);
                map.insert("password".to_string(), Value::Null);
            }
            Self::Legacy {
                auth_type,
                username,
                password,
            } => {
                map.insert("type".to_string(), opt_string(auth_type));
                map.insert("username".to_string(), opt_string(username));
                map.insert("password".to_string(), opt_string(password));
            }
            Self::Raw {
                auth_type,
                raw_auth,
            } => {
                map.insert("type".to_string(), Value::String(auth_type.clone()));
                map.insert("raw_auth".to_string(), Value::String(raw_auth.clone()));
            }
        }
        Value::Object(map)
    }

    /// Validate a caller-supplied descriptor.
    ///
    /// Exactly the string keys `type` and `raw_auth` are accepted; any
    /// other shape is a caller error.
    pub fn from_raw_descriptor(value: &Value) -> Result<Self, SessionError> {
        let Value::Object(map) = value else {
            return Err(SessionError::InvalidAuthDescriptor);
        };
        if map.len() != 2 || !map.contains_key("type") || !map.contains_key("raw_auth") {
            return Err(SessionError::InvalidAuthDescriptor);
        }
        match (
            map.get("type").and_then(Value::as_str),
            map.get("raw_auth").and_then(Value::as_str),
        ) {
            (Some(auth_type), Some(raw_auth)) => Ok(Self::Raw {
                auth_type: auth_type.to_string(),
                raw_auth: raw_auth.to_string(),
            }),
            _ => Err(SessionError::InvalidAuthDescriptor),
        }
    }
}

fn opt_string(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}
