//! FormSnapshot

use serde::Serialize;
use serde::ser::SerializeMap;

/// Current raw value of every field in a form, in insertion order.
///
/// Rules receive the snapshot read-only so cross-field checks (password
/// confirmation, document counts) can look at sibling values.
///
/// # Example
///
/// ```
/// use docreg_forms::FormSnapshot;
///
/// let snapshot: FormSnapshot = [("email", "ana@example.com"), ("password", "s3cret")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(snapshot.get("email"), Some("ana@example.com"));
/// assert_eq!(snapshot.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    entries: Vec<(String, String)>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, keeping the field's original position if it already exists.
    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        let field_id = field_id.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(id, _)| *id == field_id) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((field_id, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field_id, value);
        self
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == field_id)
            .map(|(_, value)| value.as_str())
    }

    /// Value with surrounding whitespace removed; missing fields read as empty.
    pub fn trimmed(&self, field_id: &str) -> &str {
        self.get(field_id).map(str::trim).unwrap_or("")
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.get(field_id).is_some()
    }

    pub fn remove(&mut self, field_id: &str) -> Option<String> {
        let index = self.entries.iter().position(|(id, _)| id == field_id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, value)| (id.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (id, value) in iter {
            snapshot.insert(id, value);
        }
        snapshot
    }
}

impl Serialize for FormSnapshot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
