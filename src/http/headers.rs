use serde_json::{Map, Value};

/// Durable session headers.
///
/// Case-insensitive identity, case-preserving storage, one value per
/// name. Insertion order is kept so serialization stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHeaders {
    headers: Vec<(String, String)>,
}

impl SessionHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with preserved casing; an existing name (case-insensitive
    /// match) is updated in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some((_, v)) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            *v = value;
        } else {
            self.headers.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Serialize as a JSON object, in insertion order.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.headers {
            map.insert(name.clone(), Value::String(value.clone()));
        }
        Value::Object(map)
    }

    /// Read back from the persisted object. Scalar non-string values are
    /// coerced to text; anything else is skipped.
    pub fn from_value(raw: Option<&Value>) -> Self {
        let mut headers = Self::new();
        if let Some(Value::Object(map)) = raw {
            for (name, value) in map {
                match value {
                    Value::String(s) => headers.insert(name.clone(), s.clone()),
                    Value::Number(n) => headers.insert(name.clone(), n.to_string()),
                    Value::Bool(b) => headers.insert(name.clone(), b.to_string()),
                    _ => {}
                }
            }
        }
        headers
    }
}

/// Incoming request headers, as handed over by the request layer.
///
/// Multi-valued: the same name may appear on several entries. A `None`
/// value is an explicit "do not send" marker, not a value to persist.
/// Values are bytes so binary-safe headers survive until they are
/// decoded for storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl AsRef<[u8]>) {
        self.entries
            .push((name.into(), Some(value.as_ref().to_vec())));
    }

    /// Record an explicitly unset header.
    pub fn push_unset(&mut self, name: impl Into<String>) {
        self.entries.push((name.into(), None));
    }

    pub fn entries(&self) -> &[(String, Option<Vec<u8>>)] {
        &self.entries
    }

    /// First set value for the name.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, v)| n.eq_ignore_ascii_case(name) && v.is_some())
            .and_then(|(_, v)| v.as_deref())
    }

    /// Number of instances of the name, set or unset.
    pub fn count(&self, name: &str) -> usize {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// Remove the first instance matching this name and value.
    pub fn remove_instance(&mut self, name: &str, value: &[u8]) {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|(n, v)| n.eq_ignore_ascii_case(name) && v.as_deref() == Some(value))
        {
            self.entries.remove(pos);
        }
    }

    /// Remove every instance of the name.
    pub fn remove_all(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
