//! The persisted session aggregate.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::auth::descriptor::AuthDescriptor;
use crate::auth::registry::{AuthCredential, AuthRegistry};
use crate::base::error::SessionError;
use crate::base::logging::{LogLevel, LogSink};
use crate::cookies::jar::CookieJar;
use crate::cookies::wire::{decode_cookie_field, encode_cookie_field, CookieShape};
use crate::http::headers::{RequestHeaders, SessionHeaders};
use crate::http::merge::{merge_request_headers, MergePolicy};
use crate::session::advisor;
use crate::session::locator::{is_anonymous_session, SessionLocator};
use crate::store;

/// A host-bound bundle of headers, cookies, and auth choice, persisted
/// between invocations of the client.
///
/// One instance exists per command invocation: construct, [`load`],
/// merge the outgoing request's state, [`save`], discard. No locking is
/// provided; concurrent invocations against the same file race
/// last-writer-wins.
///
/// [`load`]: Self::load
/// [`save`]: Self::save
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    session_id: String,
    bound_host: String,
    refactor_mode: bool,
    merge_policy: MergePolicy,
    headers: SessionHeaders,
    jar: CookieJar,
    auth: AuthDescriptor,
    cookie_shape: CookieShape,
    /// Foreign top-level fields from the file, written back on save.
    extra: Map<String, Value>,
}

impl Session {
    pub fn new(
        path: impl Into<PathBuf>,
        session_id: impl Into<String>,
        bound_host: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            session_id: session_id.into(),
            bound_host: bound_host.into(),
            refactor_mode: false,
            merge_policy: MergePolicy::default(),
            headers: SessionHeaders::new(),
            jar: CookieJar::new(),
            auth: AuthDescriptor::None,
            cookie_shape: CookieShape::default(),
            extra: Map::new(),
        }
    }

    /// Locate, construct, and load the session for one request.
    pub fn for_request(
        config_dir: &Path,
        session_name: &str,
        host: Option<&str>,
        url: &str,
        refactor_mode: bool,
        sink: &dyn LogSink,
    ) -> Result<Self, SessionError> {
        let locator = SessionLocator::for_request(config_dir, session_name, host, url)?;
        let mut session = Session::new(locator.path, locator.session_id, locator.bound_host)
            .with_refactor_mode(refactor_mode);
        session.load(sink)?;
        Ok(session)
    }

    /// Silent internal re-save path: suppresses the layout warning.
    pub fn with_refactor_mode(mut self, refactor_mode: bool) -> Self {
        self.refactor_mode = refactor_mode;
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn bound_host(&self) -> &str {
        &self.bound_host
    }

    pub fn is_anonymous(&self) -> bool {
        is_anonymous_session(&self.session_id)
    }

    /// Load persisted state.
    ///
    /// A missing file is a new empty session; a malformed one is fatal
    /// and surfaced verbatim. Detection of the insecure legacy cookie
    /// layout never blocks the load, it only emits a warning through
    /// `sink`.
    pub fn load(&mut self, sink: &dyn LogSink) -> Result<(), SessionError> {
        let raw = match store::load(&self.path) {
            Ok(raw) => raw,
            Err(SessionError::StorageNotFound { .. }) => {
                tracing::debug!(path = %self.path.display(), "no session file, starting empty");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let Value::Object(map) = raw else {
            return Err(SessionError::StorageParse {
                path: self.path.display().to_string(),
                message: "expected a JSON object".to_string(),
            });
        };

        self.headers = SessionHeaders::from_value(map.get("headers"));
        let decoded = decode_cookie_field(map.get("cookies"), &mut self.jar);
        self.cookie_shape = decoded.shape;
        self.auth = AuthDescriptor::from_value(map.get("auth"));
        self.extra = map
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "headers" | "cookies" | "auth"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if let Some(warning) = advisor::advise(
            decoded.insecure_legacy,
            self.refactor_mode,
            &self.bound_host,
            &self.session_id,
        ) {
            sink.log(&warning, LogLevel::Warning);
        }

        tracing::debug!(
            path = %self.path.display(),
            headers = self.headers.len(),
            cookies = self.jar.len(),
            "session loaded"
        );
        Ok(())
    }

    /// Persist the aggregate.
    ///
    /// Expired cookies are pruned first, and the cookie field is
    /// re-derived from the live jar in the shape the file already used,
    /// so a legacy mapping file stays mapping-shaped until an explicit
    /// upgrade rewrites it.
    pub fn save(&mut self) -> Result<(), SessionError> {
        self.prune_expired();

        let mut map = Map::new();
        map.insert("headers".to_string(), self.headers.to_value());
        map.insert(
            "cookies".to_string(),
            encode_cookie_field(&self.jar, self.cookie_shape)?,
        );
        map.insert("auth".to_string(), self.auth.to_value());
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }

        store::save(&self.path, &Value::Object(map))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Merge the outgoing request's headers into durable state.
    ///
    /// Consumed `Cookie` headers are removed from `incoming`; everything
    /// else in `incoming` is left for the request layer to send.
    pub fn update_headers(&mut self, incoming: &mut RequestHeaders) {
        let policy = self.merge_policy.clone();
        merge_request_headers(&policy, &mut self.headers, &mut self.jar, incoming);
    }

    pub fn headers(&self) -> &SessionHeaders {
        &self.headers
    }

    pub fn set_headers(&mut self, headers: SessionHeaders) {
        self.headers = headers;
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.jar
    }

    pub fn cookies_mut(&mut self) -> &mut CookieJar {
        &mut self.jar
    }

    pub fn set_cookies(&mut self, jar: CookieJar) {
        self.jar = jar;
    }

    /// Drop expired cookies from the live jar. Callers that need a fresh
    /// view invoke this before reading; [`save`](Self::save) invokes it
    /// unconditionally.
    pub fn prune_expired(&mut self) {
        self.jar.clear_expired(OffsetDateTime::now_utc());
    }

    /// Remove cookies by name, optionally constrained to a domain and a
    /// path.
    pub fn remove_cookie(&mut self, name: &str, domain: Option<&str>, path: Option<&str>) {
        self.jar.remove(name, domain, path);
    }

    /// Resolve the stored auth choice into a usable credential through
    /// the host client's capability registry.
    pub fn auth(
        &self,
        registry: &AuthRegistry,
    ) -> Result<Option<Box<dyn AuthCredential>>, SessionError> {
        registry.resolve(&self.auth)
    }

    pub fn auth_descriptor(&self) -> &AuthDescriptor {
        &self.auth
    }

    /// Record a new auth choice from caller input. Exactly the keys
    /// `type` and `raw_auth` are accepted.
    pub fn set_auth(&mut self, descriptor: &Value) -> Result<(), SessionError> {
        self.auth = AuthDescriptor::from_raw_descriptor(descriptor)?;
        Ok(())
    }

    /// Record a new auth choice from an already-typed descriptor.
    pub fn set_auth_descriptor(&mut self, descriptor: AuthDescriptor) {
        self.auth = descriptor;
    }
}
