//! Bit-flag permission model.
//!
//! A permission mask packs many independent grants into one `u64`: bit `i` set
//! means permission `i` is granted. Bit positions come from a `PermissionTable`,
//! never from iteration order, so masks stay stable as tables grow.
//!
//! All functions here are pure. Bits a table does not know about are carried
//! through every mutation untouched and are simply never surfaced for display.
//!
//! # Example
//!
//! ```
//! use chanform_core::permissions::{PermissionTable, has_bit, set_bit, clear_bit};
//!
//! let mask = set_bit(0, 2);
//! assert_eq!(mask, 0b100);
//! assert!(has_bit(mask, 2));
//! assert_eq!(clear_bit(mask, 2), 0);
//!
//! let table = PermissionTable::channel();
//! let view = table.materialize(0b010);
//! assert_eq!(view.len(), table.len());
//! assert!(view[1].is_set);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of independent flags a mask can hold.
pub const MASK_BITS: u32 = u64::BITS;

/// Whether `bit` is set in `mask`. Bits at or beyond `MASK_BITS` are never set.
#[inline]
pub fn has_bit(mask: u64, bit: u32) -> bool {
    bit < MASK_BITS && (mask >> bit) & 1 == 1
}

/// `mask` with `bit` set. Out-of-range bits leave the mask unchanged.
#[inline]
pub fn set_bit(mask: u64, bit: u32) -> u64 {
    match 1u64.checked_shl(bit) {
        Some(flag) => mask | flag,
        None => mask,
    }
}

/// `mask` with `bit` cleared. Out-of-range bits leave the mask unchanged.
#[inline]
pub fn clear_bit(mask: u64, bit: u32) -> u64 {
    match 1u64.checked_shl(bit) {
        Some(flag) => mask & !flag,
        None => mask,
    }
}

/// Set `bit` when `checked`, clear it otherwise.
#[inline]
pub fn toggle_bit(mask: u64, bit: u32, checked: bool) -> u64 {
    if checked {
        set_bit(mask, bit)
    } else {
        clear_bit(mask, bit)
    }
}

/// Display metadata for one permission bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// Bit position in the mask.
    pub bit: u32,
    /// Label key.
    pub name: String,
    /// Icon key.
    pub icon: String,
    /// Description key.
    pub description: String,
}

impl PermissionEntry {
    /// Create an entry.
    pub fn new(
        bit: u32,
        name: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            bit,
            name: name.into(),
            icon: icon.into(),
            description: description.into(),
        }
    }
}

/// Read-only view of one permission against a mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDescriptor {
    pub bit: u32,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub is_set: bool,
}

/// Build one descriptor per table entry, in table order.
pub fn materialize(table: &[PermissionEntry], mask: u64) -> Vec<PermissionDescriptor> {
    table
        .iter()
        .map(|entry| PermissionDescriptor {
            bit: entry.bit,
            name: entry.name.clone(),
            icon: entry.icon.clone(),
            description: entry.description.clone(),
            is_set: has_bit(mask, entry.bit),
        })
        .collect()
}

/// An ordered, immutable list of known permission bits for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionTable {
    entries: Vec<PermissionEntry>,
}

impl PermissionTable {
    /// Validate and wrap `entries`.
    ///
    /// Rejects bits outside the mask width and duplicated bits.
    pub fn new(entries: Vec<PermissionEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.bit >= MASK_BITS {
                return Err(Error::InvalidPermissionTable(format!(
                    "bit {} of {} exceeds mask width {}",
                    entry.bit, entry.name, MASK_BITS
                )));
            }
            if !seen.insert(entry.bit) {
                return Err(Error::InvalidPermissionTable(format!(
                    "bit {} assigned twice",
                    entry.bit
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Load a table from a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<PermissionEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// The channel permission domain.
    pub fn channel() -> Self {
        Self {
            entries: vec![
                PermissionEntry::new(
                    0,
                    "servers.channelPermissions.privateChannel",
                    "lock",
                    "servers.channelPermissions.privateChannelDescription",
                ),
                PermissionEntry::new(
                    1,
                    "servers.channelPermissions.sendMessage",
                    "mail",
                    "servers.channelPermissions.sendMessageDescription",
                ),
                PermissionEntry::new(
                    2,
                    "servers.channelPermissions.sendAttachments",
                    "attach_file",
                    "servers.channelPermissions.sendAttachmentsDescription",
                ),
            ],
        }
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[PermissionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `bit`, if known.
    pub fn get(&self, bit: u32) -> Option<&PermissionEntry> {
        self.entries.iter().find(|e| e.bit == bit)
    }

    /// Mask with every known bit set.
    pub fn known_mask(&self) -> u64 {
        self.entries.iter().fold(0, |mask, e| set_bit(mask, e.bit))
    }

    /// Bits set in `mask` that this table does not describe.
    pub fn unknown_bits(&self, mask: u64) -> u64 {
        mask & !self.known_mask()
    }

    /// Descriptors for `mask`, one per entry, in table order.
    pub fn materialize(&self, mask: u64) -> Vec<PermissionDescriptor> {
        materialize(&self.entries, mask)
    }
}
