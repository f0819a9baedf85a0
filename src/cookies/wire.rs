//! On-disk cookie field codec.
//!
//! Session files have stored cookies in two shapes: a legacy object keyed
//! by cookie name (domain implicit) and the current list of records with
//! an explicit `domain`. Decoding dispatches on the shape once and feeds
//! everything into the live jar; encoding always re-derives the field
//! from the jar, in the shape the file already used.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::base::error::SessionError;
use crate::cookies::jar::CookieJar;
use crate::cookies::record::{SessionCookie, DEFAULT_COOKIE_PATH};

/// On-disk shape of the cookie field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookieShape {
    /// Current layout: a list of records with explicit domains.
    #[default]
    List,
    /// Legacy layout: an object keyed by cookie name.
    Mapping,
}

/// Outcome of decoding the raw cookie field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedCookies {
    pub shape: CookieShape,
    /// At least one mapping-shaped record had no usable domain, i.e. a
    /// cookie that cannot be bound to a host.
    pub insecure_legacy: bool,
}

/// One cookie record as it appears on disk.
///
/// `domain` is double-optional because a missing key and an explicit
/// `null` are different states: only the former marks the insecure legacy
/// layout, only the latter survives round trips as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireCookie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    value: String,
    #[serde(default, deserialize_with = "present_or_absent")]
    domain: Option<Option<String>>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    expires: Option<i64>,
    #[serde(default)]
    secure: bool,
}

/// Decode the raw cookie field into `jar`.
///
/// Both historical layouts are accepted transparently. Records land in
/// the jar through [`CookieJar::set`], so later entries with the same
/// `(name, domain, path)` overwrite earlier ones. Records that do not
/// parse are skipped.
pub fn decode_cookie_field(raw: Option<&Value>, jar: &mut CookieJar) -> DecodedCookies {
    let mut decoded = DecodedCookies::default();

    match raw {
        Some(Value::Object(map)) => {
            decoded.shape = CookieShape::Mapping;
            for (name, attrs) in map {
                let Ok(wire) = serde_json::from_value::<WireCookie>(attrs.clone()) else {
                    tracing::debug!(cookie = %name, "skipping unparseable cookie record");
                    continue;
                };
                decoded.insecure_legacy |= insert_wire(jar, wire, Some(name.as_str()), true);
            }
        }
        Some(Value::Array(list)) => {
            for record in list {
                let Ok(wire) = serde_json::from_value::<WireCookie>(record.clone()) else {
                    tracing::debug!("skipping unparseable cookie record");
                    continue;
                };
                insert_wire(jar, wire, None, false);
            }
        }
        _ => {}
    }

    decoded
}

/// Materialize the live jar back into the on-disk cookie field.
///
/// Always derives from the jar, never from the originally decoded raw
/// value, so expiry pruning and in-memory mutations are reflected.
/// `Mapping` keeps the legacy object layout for backward compatibility;
/// duplicate names collapse to the last one in resolution order.
pub fn encode_cookie_field(jar: &CookieJar, shape: CookieShape) -> Result<Value, SessionError> {
    match shape {
        CookieShape::List => {
            let records: Vec<WireCookie> =
                jar.iter().map(|cookie| materialize(cookie, true)).collect();
            to_json(&records)
        }
        CookieShape::Mapping => {
            let mut map = serde_json::Map::new();
            for cookie in jar.iter() {
                map.insert(cookie.name.clone(), to_json(&materialize(cookie, false))?);
            }
            Ok(Value::Object(map))
        }
    }
}

fn insert_wire(
    jar: &mut CookieJar,
    wire: WireCookie,
    name_override: Option<&str>,
    from_mapping: bool,
) -> bool {
    let mut insecure = false;
    let name = name_override
        .map(str::to_string)
        .or(wire.name)
        .unwrap_or_default();

    let mut cookie = SessionCookie::new(name, wire.value);
    cookie.path = wire
        .path
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_COOKIE_PATH.to_string());
    cookie.expires = wire.expires;
    cookie.secure = wire.secure;

    match wire.domain {
        Some(Some(domain)) => {
            // An empty domain is only flagged when the source was the
            // legacy mapping layout; a list-shaped record with "" is
            // accepted as-is.
            if domain.is_empty() && from_mapping {
                insecure = true;
            }
            cookie.domain = domain;
        }
        // Explicit null: no domain was ever recorded, on purpose.
        Some(None) => cookie.explicit_none = true,
        None => {
            if from_mapping {
                insecure = true;
            }
        }
    }

    jar.set(cookie);
    insecure
}

fn materialize(cookie: &SessionCookie, with_name: bool) -> WireCookie {
    let domain = if cookie.explicit_none && cookie.domain.is_empty() {
        None
    } else {
        Some(cookie.domain.clone())
    };
    WireCookie {
        name: with_name.then(|| cookie.name.clone()),
        value: cookie.value.clone(),
        domain: Some(domain),
        path: Some(cookie.path.clone()),
        expires: cookie.expires,
        secure: cookie.secure,
    }
}

/// Keeps a present-but-`null` key distinguishable from an absent one:
/// absent falls back to the field default (outer `None`), while any
/// present value, `null` included, lands in the outer `Some`.
fn present_or_absent<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, SessionError> {
    serde_json::to_value(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping_without_domain_is_insecure() {
        let raw = json!({
            "sid": {"value": "abc", "path": "/", "secure": false, "expires": null}
        });
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        assert_eq!(decoded.shape, CookieShape::Mapping);
        assert!(decoded.insecure_legacy);
        let cookie = jar.get_by_name("sid").unwrap();
        assert_eq!(cookie.value, "abc");
        assert_eq!(cookie.domain, "");
        assert!(!cookie.explicit_none);
    }

    #[test]
    fn test_mapping_with_domain_is_fine() {
        let raw = json!({
            "sid": {"value": "abc", "domain": "example.com"}
        });
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        assert!(!decoded.insecure_legacy);
        assert_eq!(jar.get_by_name("sid").unwrap().domain, "example.com");
    }

    #[test]
    fn test_list_with_explicit_null_domain_is_not_flagged() {
        let raw = json!([
            {"name": "sid", "value": "abc", "domain": null, "path": "/", "secure": true, "expires": null}
        ]);
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        assert_eq!(decoded.shape, CookieShape::List);
        assert!(!decoded.insecure_legacy);
        let cookie = jar.get_by_name("sid").unwrap();
        assert!(cookie.explicit_none);
        assert_eq!(cookie.domain, "");
        assert!(cookie.secure);
    }

    #[test]
    fn test_mapping_with_explicit_null_domain_is_not_flagged() {
        let raw = json!({"sid": {"value": "abc", "domain": null}});
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        assert!(!decoded.insecure_legacy);
        assert!(jar.get_by_name("sid").unwrap().explicit_none);
    }

    #[test]
    fn test_list_with_empty_domain_is_not_flagged() {
        // The asymmetry is deliberate: only the mapping layout warns.
        let raw = json!([{"name": "sid", "value": "abc", "domain": ""}]);
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        assert!(!decoded.insecure_legacy);
        assert!(!jar.get_by_name("sid").unwrap().explicit_none);
    }

    #[test]
    fn test_missing_or_unrecognized_field_decodes_empty() {
        let mut jar = CookieJar::new();
        assert_eq!(decode_cookie_field(None, &mut jar), DecodedCookies::default());
        assert_eq!(
            decode_cookie_field(Some(&json!("bogus")), &mut jar),
            DecodedCookies::default()
        );
        assert!(jar.is_empty());
    }

    #[test]
    fn test_later_duplicates_overwrite() {
        let raw = json!([
            {"name": "sid", "value": "old", "domain": "example.com"},
            {"name": "sid", "value": "new", "domain": "example.com"}
        ]);
        let mut jar = CookieJar::new();
        decode_cookie_field(Some(&raw), &mut jar);

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_by_name("sid").unwrap().value, "new");
    }

    #[test]
    fn test_list_round_trip() {
        let raw = json!([
            {"name": "a", "value": "1", "domain": "example.com", "path": "/", "expires": 4102444800i64, "secure": true},
            {"name": "b", "value": "2", "domain": null, "path": "/api", "expires": null, "secure": false}
        ]);
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        let encoded = encode_cookie_field(&jar, decoded.shape).unwrap();
        let records = encoded.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "a");
        assert_eq!(records[0]["expires"], 4102444800i64);
        // Explicit null survives as null, not "".
        assert_eq!(records[1]["domain"], Value::Null);

        let mut jar2 = CookieJar::new();
        decode_cookie_field(Some(&encoded), &mut jar2);
        assert_eq!(jar, jar2);
    }

    #[test]
    fn test_mapping_shape_preserved_on_encode() {
        let raw = json!({"sid": {"value": "abc"}});
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        let encoded = encode_cookie_field(&jar, decoded.shape).unwrap();
        let map = encoded.as_object().unwrap();
        assert_eq!(map.len(), 1);
        // Key is the name; the record itself carries no name field.
        let record = map.get("sid").unwrap().as_object().unwrap();
        assert!(!record.contains_key("name"));
        assert_eq!(record.get("value").unwrap(), "abc");
    }

    #[test]
    fn test_encode_reflects_live_jar_not_raw() {
        let raw = json!({"sid": {"value": "abc"}});
        let mut jar = CookieJar::new();
        let decoded = decode_cookie_field(Some(&raw), &mut jar);

        jar.set(SessionCookie::new("extra", "1").with_domain("example.com"));
        jar.remove("sid", None, None);

        let encoded = encode_cookie_field(&jar, decoded.shape).unwrap();
        let map = encoded.as_object().unwrap();
        assert!(map.get("sid").is_none());
        assert!(map.get("extra").is_some());
    }
}
