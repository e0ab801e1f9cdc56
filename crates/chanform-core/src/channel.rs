//! Channel records and their editable projection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{Baseline, Editable};
use crate::value::{Value, ValueKind};

/// Identity of a channel: the server it lives in plus its own id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelKey {
    pub server_id: String,
    pub channel_id: String,
}

impl ChannelKey {
    /// Create a key.
    pub fn new(server_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.server_id, self.channel_id)
    }
}

/// A committed channel as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub server_id: String,
    pub name: String,
    #[serde(default)]
    pub permissions: u64,
}

impl Channel {
    /// Create a channel.
    pub fn new(
        server_id: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        permissions: u64,
    ) -> Self {
        Self {
            id: id.into(),
            server_id: server_id.into(),
            name: name.into(),
            permissions,
        }
    }

    /// Identity of this channel.
    pub fn key(&self) -> ChannelKey {
        ChannelKey::new(self.server_id.clone(), self.id.clone())
    }

    /// The editable projection of this channel.
    pub fn fields(&self) -> ChannelFields {
        ChannelFields {
            name: self.name.clone(),
            permissions: self.permissions,
        }
    }

    /// The projection tagged with this channel's identity.
    pub fn baseline(&self) -> Baseline<ChannelKey, ChannelFields> {
        Baseline::new(self.key(), self.fields())
    }

    /// Copy edited fields back onto the committed record.
    pub fn absorb(&mut self, fields: ChannelFields) {
        self.name = fields.name;
        self.permissions = fields.permissions;
    }
}

/// The fields a channel settings form can edit.
///
/// Defaults (empty name, no permissions) are what a form shows once its
/// channel has disappeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFields {
    pub name: String,
    pub permissions: u64,
}

impl ChannelFields {
    /// Display name field.
    pub const NAME: &'static str = "name";
    /// Permission mask field.
    pub const PERMISSIONS: &'static str = "permissions";

    /// Create a field set.
    pub fn new(name: impl Into<String>, permissions: u64) -> Self {
        Self {
            name: name.into(),
            permissions,
        }
    }
}

impl Editable for ChannelFields {
    fn fields() -> &'static [&'static str] {
        &[Self::NAME, Self::PERMISSIONS]
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            Self::NAME => Some(Value::Text(self.name.clone())),
            Self::PERMISSIONS => Some(Value::Mask(self.permissions)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match (field, value) {
            (Self::NAME, Value::Text(name)) => {
                self.name = name;
                Ok(())
            }
            (Self::PERMISSIONS, Value::Mask(mask)) => {
                self.permissions = mask;
                Ok(())
            }
            (Self::NAME, other) => Err(mismatch(field, ValueKind::Text, &other)),
            (Self::PERMISSIONS, other) => Err(mismatch(field, ValueKind::Mask, &other)),
            (unknown, _) => Err(Error::UnknownField(unknown.to_string())),
        }
    }
}

fn mismatch(field: &str, expected: ValueKind, found: &Value) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}
