//! Merge incoming request headers into durable session state.

use cookie::Cookie;

use crate::cookies::jar::CookieJar;
use crate::cookies::record::{SessionCookie, DEFAULT_COOKIE_PATH};
use crate::http::headers::{RequestHeaders, SessionHeaders};

/// Configuration for the header merge.
///
/// `ignored_prefixes` name header families that describe a single request
/// rather than durable session state (content negotiation, conditional
/// requests). `default_agent_prefix` is the host client's own User-Agent
/// prefix; a stored custom agent is never overwritten with it.
#[derive(Debug, Clone)]
pub struct MergePolicy {
    pub ignored_prefixes: Vec<String>,
    pub default_agent_prefix: String,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            ignored_prefixes: vec!["Content-".to_string(), "If-".to_string()],
            default_agent_prefix: "sessionjar/".to_string(),
        }
    }
}

impl MergePolicy {
    fn is_ignored(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.ignored_prefixes
            .iter()
            .any(|prefix| name.starts_with(&prefix.to_ascii_lowercase()))
    }
}

/// Fold `incoming` into the session's durable headers and cookie jar.
///
/// Headers are independent; evaluation order between names carries no
/// meaning. A consumed `Cookie` header is removed from `incoming` so the
/// request layer does not also send it as a literal header field; when
/// several `Cookie` instances exist only the consumed one is removed.
pub fn merge_request_headers(
    policy: &MergePolicy,
    stored: &mut SessionHeaders,
    jar: &mut CookieJar,
    incoming: &mut RequestHeaders,
) {
    for (name, raw_value) in incoming.entries().to_vec() {
        // Explicitly unset: a "do not send" marker, nothing to persist.
        let Some(raw_value) = raw_value else { continue };
        let value = String::from_utf8_lossy(&raw_value).into_owned();

        if name.eq_ignore_ascii_case("user-agent")
            && value.starts_with(&policy.default_agent_prefix)
        {
            continue;
        }

        if name.eq_ignore_ascii_case("cookie") {
            fold_cookie_header(jar, &value);
            if incoming.count(&name) > 1 {
                incoming.remove_instance(&name, &raw_value);
            } else {
                incoming.remove_all(&name);
            }
            continue;
        }

        if policy.is_ignored(&name) {
            continue;
        }

        stored.insert(name, value);
    }
}

/// Parse the pairs of a `Cookie` header value into the jar.
fn fold_cookie_header(jar: &mut CookieJar, value: &str) {
    for parsed in Cookie::split_parse(value) {
        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unparseable cookie pair");
                continue;
            }
        };
        let mut cookie = SessionCookie::new(parsed.name(), parsed.value());
        cookie.path = parsed.path().unwrap_or(DEFAULT_COOKIE_PATH).to_string();
        jar.set(cookie);
    }
}
