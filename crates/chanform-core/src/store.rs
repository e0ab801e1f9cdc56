//! Shared store of committed channel records.
//!
//! Forms only ever read from the store (through projectors). Writes come from
//! whoever applies server responses and pushes: the remote service, a socket
//! handler, or a test harness. Every write bumps `revision()`, which readers
//! can poll to notice changes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::channel::{Channel, ChannelFields, ChannelKey};
use crate::error::{Error, Result};
use crate::patch::Patch;
use crate::record::{Baseline, Projector};

/// A cheaply clonable handle to the committed channel records.
///
/// # Example
///
/// ```
/// use chanform_core::{Channel, ChannelStore, Projector};
///
/// let store = ChannelStore::new();
/// store.insert(Channel::new("srv", "c1", "general", 0));
///
/// let projector = store.projector("c1");
/// assert_eq!(projector.project().unwrap().fields.name, "general");
///
/// store.remove("c1");
/// assert!(projector.project().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    channels: Arc<RwLock<HashMap<String, Channel>>>,
    revision: Arc<AtomicU64>,
}

impl ChannelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Channel>> {
        self.channels.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Channel>> {
        self.channels.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Insert or replace a channel.
    pub fn insert(&self, channel: Channel) {
        tracing::debug!(channel = %channel.key(), "Storing channel");
        self.write().insert(channel.id.clone(), channel);
        self.bump();
    }

    /// Current committed record for `channel_id`.
    pub fn get(&self, channel_id: &str) -> Option<Channel> {
        self.read().get(channel_id).cloned()
    }

    /// Whether `channel_id` is present.
    pub fn contains(&self, channel_id: &str) -> bool {
        self.read().contains_key(channel_id)
    }

    /// Apply a committed patch (e.g. a server update event) to a channel.
    pub fn apply_patch(&self, channel_id: &str, patch: &Patch) -> Result<()> {
        {
            let mut channels = self.write();
            let channel = channels
                .get_mut(channel_id)
                .ok_or_else(|| Error::EntityVanished(channel_id.to_string()))?;
            let mut fields = channel.fields();
            patch.apply_to(&mut fields)?;
            channel.absorb(fields);
        }
        let revision = self.bump();
        tracing::debug!(
            channel_id,
            fields = ?patch.fields(),
            revision,
            "Applied channel patch"
        );
        Ok(())
    }

    /// Remove a channel (deleted here or elsewhere).
    pub fn remove(&self, channel_id: &str) -> Option<Channel> {
        let removed = self.write().remove(channel_id);
        if removed.is_some() {
            self.bump();
            tracing::debug!(channel_id, "Removed channel");
        }
        removed
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Number of stored channels.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Baseline projection for `channel_id`, re-evaluated on every call.
    pub fn projector(&self, channel_id: &str) -> ChannelProjector {
        ChannelProjector {
            store: self.clone(),
            channel_id: channel_id.to_string(),
        }
    }
}

/// Projects one channel's editable fields out of a `ChannelStore`.
#[derive(Debug, Clone)]
pub struct ChannelProjector {
    store: ChannelStore,
    channel_id: String,
}

impl ChannelProjector {
    /// Id of the channel this projector reads.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// The store this projector reads from.
    pub fn store(&self) -> &ChannelStore {
        &self.store
    }
}

impl Projector<ChannelKey, ChannelFields> for ChannelProjector {
    fn project(&self) -> Option<Baseline<ChannelKey, ChannelFields>> {
        self.store.get(&self.channel_id).map(|c| c.baseline())
    }
}
