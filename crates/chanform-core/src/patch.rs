//! Minimal change sets: only the fields the user actually changed.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::record::Editable;
use crate::value::Value;

/// An ordered set of `field -> value` changes.
///
/// Entries keep the record's field declaration order. A field appears at most
/// once; pushing it again replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    entries: Vec<(&'static str, Value)>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change for `field`.
    pub fn push(&mut self, field: &'static str, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            slot.1 = value;
        } else {
            self.entries.push((field, value));
        }
    }

    /// Builder-style `push`.
    pub fn with(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.push(field, value.into());
        self
    }

    /// Value recorded for `field`, if it changed.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    /// Whether `field` is part of this patch.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// True when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Changed field names, in order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(f, _)| *f).collect()
    }

    /// Iterate over `(field, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }

    /// Write every entry into `record`.
    pub fn apply_to<R: Editable>(&self, record: &mut R) -> Result<()> {
        for (field, value) in &self.entries {
            record.set(field, value.clone())?;
        }
        Ok(())
    }

    /// Serialize as a JSON object in field order.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
