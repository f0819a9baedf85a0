//! Session identity: file path, display id, bound host.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use url::Url;

use crate::base::error::SessionError;

/// Directory under the config root holding named session files.
pub const SESSIONS_DIR_NAME: &str = "sessions";

/// A session name containing a path separator is anonymous: the name is
/// itself the file path, not subject to host-based placement.
pub fn is_anonymous_session(name: &str) -> bool {
    name.contains(MAIN_SEPARATOR) || name.contains('/')
}

/// Named sessions are restricted to this charset; anything richer must be
/// given as a path (anonymous session).
fn is_valid_session_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Host portion of a URL, with its explicit port when one is written.
/// Empty when the URL does not parse or carries no host.
pub fn host_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };
    match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Strip a trailing `:port` while leaving bracketed IPv6 literals and
/// bare IPv6 addresses intact.
fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((stripped, port))
            if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            // A remaining colon outside brackets means the "port" was a
            // segment of a bare IPv6 address.
            if stripped.contains(':') && !stripped.starts_with('[') {
                host
            } else {
                stripped
            }
        }
        _ => host,
    }
}

/// On-disk identity of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLocator {
    /// Session file location.
    pub path: PathBuf,
    /// Display id: the bare name for named sessions, the expanded path
    /// for anonymous ones.
    pub session_id: String,
    /// Lowercase hostname the session is pinned to, port stripped.
    pub bound_host: String,
}

impl SessionLocator {
    /// Compute the identity for one request.
    ///
    /// The binding host comes from the explicit `host` argument, else
    /// from the request URL, defaulting to `localhost` (transports with
    /// no hostname still need a stable binding). Named sessions file
    /// under `<config_dir>/sessions/<host>/<name>.json`, so two hosts
    /// never collide on the same named-session file; anonymous sessions
    /// are wherever the user pointed them.
    pub fn for_request(
        config_dir: &Path,
        session_name: &str,
        host: Option<&str>,
        url: &str,
    ) -> Result<Self, SessionError> {
        let mut bound_hostname = host
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| host_of(url));
        if bound_hostname.is_empty() {
            bound_hostname = "localhost".to_string();
        }
        let bound_hostname = bound_hostname.to_lowercase();
        let bound_host = strip_port(&bound_hostname).to_string();

        if is_anonymous_session(session_name) {
            let path = expand_user(session_name);
            let session_id = path.to_string_lossy().into_owned();
            return Ok(Self {
                path,
                session_id,
                bound_host,
            });
        }

        if !is_valid_session_name(session_name) {
            return Err(SessionError::InvalidSessionName(session_name.to_string()));
        }

        // host:port → host_port, for hosts that keep a colon (IPv6).
        let host_dir = bound_host.replace(':', "_");
        let path = config_dir
            .join(SESSIONS_DIR_NAME)
            .join(host_dir)
            .join(format!("{session_name}.json"));
        Ok(Self {
            path,
            session_id: session_name.to_string(),
            bound_host,
        })
    }
}

/// `~` and `~/...` expansion against `HOME` (or `USERPROFILE`).
fn expand_user(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            if path == "~" {
                return PathBuf::from(home);
            }
            return Path::new(&home).join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_session_path() {
        let locator = SessionLocator::for_request(
            Path::new("/cfg"),
            "work",
            Some("api.example.com:443"),
            "",
        )
        .unwrap();

        assert_eq!(
            locator.path,
            Path::new("/cfg/sessions/api.example.com/work.json")
        );
        assert_eq!(locator.session_id, "work");
        assert_eq!(locator.bound_host, "api.example.com");
    }

    #[test]
    fn test_host_falls_back_to_url_then_localhost() {
        let from_url =
            SessionLocator::for_request(Path::new("/cfg"), "s", None, "https://EXAMPLE.org/x")
                .unwrap();
        assert_eq!(from_url.bound_host, "example.org");

        let fallback = SessionLocator::for_request(Path::new("/cfg"), "s", None, "").unwrap();
        assert_eq!(fallback.bound_host, "localhost");
        assert_eq!(fallback.path, Path::new("/cfg/sessions/localhost/s.json"));
    }

    #[test]
    fn test_explicit_port_in_url_is_kept_by_host_of() {
        assert_eq!(host_of("http://example.com:8080/x"), "example.com:8080");
        assert_eq!(host_of("https://example.com/x"), "example.com");
        assert_eq!(host_of("not a url"), "");
    }

    #[test]
    fn test_anonymous_session_uses_name_as_path() {
        let locator =
            SessionLocator::for_request(Path::new("/cfg"), "/tmp/x.json", None, "").unwrap();
        assert_eq!(locator.path, Path::new("/tmp/x.json"));
        assert_eq!(locator.session_id, "/tmp/x.json");
    }

    #[test]
    fn test_anonymous_session_bypasses_charset_check() {
        let locator =
            SessionLocator::for_request(Path::new("/cfg"), "/tmp/weird name!.json", None, "")
                .unwrap();
        assert_eq!(locator.session_id, "/tmp/weird name!.json");
    }

    #[test]
    fn test_invalid_named_session_rejected() {
        for name in ["bad name!", "", "semi;colon"] {
            let result = SessionLocator::for_request(Path::new("/cfg"), name, None, "");
            assert!(matches!(
                result,
                Err(SessionError::InvalidSessionName(_))
            ));
        }
    }

    #[test]
    fn test_ipv6_host_dir_replaces_colons() {
        let locator =
            SessionLocator::for_request(Path::new("/cfg"), "s", Some("[::1]:8080"), "").unwrap();
        assert_eq!(locator.bound_host, "[::1]");
        assert_eq!(locator.path, Path::new("/cfg/sessions/[__1]/s.json"));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com:443"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("example.com:http"), "example.com:http");
    }
}
