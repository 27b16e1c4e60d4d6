use std::collections::BTreeMap;

/// Field names with conventional meaning.
///
/// The record itself is schema-free: any literal name found on the wire
/// becomes a key. These constants only name the common ones.
pub mod field {
    pub const DATA: &str = "data";
    pub const EVENT: &str = "event";
    pub const ID: &str = "id";
    pub const RETRY: &str = "retry";
}

/// One parsed SSE message: an open mapping from field name to value.
///
/// ```text
///   event: update          ┌──────────┬───────────┐
///   id: 7           ──▶    │ "data"   │ "{...}"   │
///   data: {...}            │ "event"  │ "update"  │
///                          │ "id"     │ "7"       │
///                          └──────────┴───────────┘
/// ```
///
/// `data` is present only when the frame had at least one `data` line.
/// Values are kept as raw strings; `retry` is not checked to be numeric.
/// Keys are stored sorted so iteration and `Debug` output are
/// deterministic; insertion order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SseMessage {
    fields: BTreeMap<String, String>,
}

impl SseMessage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.get(field::DATA)
    }

    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.get(field::EVENT)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get(field::ID)
    }

    #[must_use]
    pub fn retry(&self) -> Option<&str> {
        self.get(field::RETRY)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// Mutable access for the field parser's merge step.
    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut String> {
        self.fields.get_mut(key)
    }
}

impl From<BTreeMap<String, String>> for SseMessage {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SseMessage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for SseMessage {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
