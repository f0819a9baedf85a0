use time::OffsetDateTime;

/// Cookie path used when a stored or parsed cookie carries none.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// One cookie as stored in a session file.
///
/// `domain` distinguishes three states: a concrete domain binds the
/// cookie to that host; an empty domain with `explicit_none` set records
/// that the file carried an explicit `null` (no domain, on purpose); an
/// empty domain without the marker is a host-unbound cookie inherited
/// from the legacy layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Expiry as unix seconds; `None` for session cookies.
    pub expires: Option<i64>,
    pub secure: bool,
    /// Set when the on-disk record carried `"domain": null`.
    pub explicit_none: bool,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: DEFAULT_COOKIE_PATH.to_string(),
            expires: None,
            secure: false,
            explicit_none: false,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_expires(mut self, expires: i64) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        match self.expires {
            Some(expiry) => expiry < now.unix_timestamp(),
            None => false,
        }
    }
}
