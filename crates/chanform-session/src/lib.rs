//! Working-copy tracking and save/delete workflows for chanform.
//!
//! The `EditSession` is the diff engine behind every settings form. It holds a
//! working copy of one entity's editable fields, re-reads the committed baseline
//! through a `Projector`, and reports the minimal patch of fields the user changed.
//!
//! # Design Philosophy
//!
//! - **Pull, not push**: every read re-evaluates the projector, so the diff empties
//!   on its own once the store catches up with a save
//! - **One entity at a time**: a baseline with a different key rebuilds the working
//!   copy and drops pending edits
//! - **No I/O**: sessions never talk to the network; `SaveFlow` and
//!   `DeleteConfirmation` are plain state machines driven by the caller
//!
//! # Example
//!
//! ```ignore
//! let mut session = EditSession::new(store.projector(&channel_id));
//!
//! session.set("name", Value::from("general-chat"))?;
//! let patch = session.diff(); // {"name": "general-chat"}
//! ```

use std::fmt::Debug;

use chanform_core::{Baseline, Editable, Error, FieldsSet, Patch, Projector, Result, Value};

pub mod delete;
pub mod save;

pub use delete::{CloseReason, DeleteConfirmation, DeleteState};
pub use save::{SaveFlow, SaveState};

// ============================================================================
// Sync Outcome
// ============================================================================

/// What a `sync()` found when it re-read the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Same entity, same committed values.
    Unchanged,
    /// Same entity, committed values moved; untouched fields followed them.
    Rebased,
    /// A different entity; the working copy was rebuilt from scratch.
    Reinitialized,
    /// No baseline; the working copy holds defaults.
    Vanished,
}

// ============================================================================
// Edit Session
// ============================================================================

/// Working copy of one entity's editable fields, diffed against its baseline.
pub struct EditSession<K, R, P>
where
    R: Editable,
    P: Projector<K, R>,
{
    /// Recomputes the committed baseline.
    projector: P,
    /// Identity the working copy was built from. `None` once the entity vanished.
    key: Option<K>,
    /// Last baseline fields seen by `sync()`.
    baseline: R,
    /// The user's copy.
    working: R,
    /// Fields written through `set()` since the last reset.
    touched: FieldsSet,
}

impl<K, R, P> EditSession<K, R, P>
where
    K: Clone + PartialEq + Debug,
    R: Editable,
    P: Projector<K, R>,
{
    /// Create a session whose working copy equals the current baseline.
    pub fn new(projector: P) -> Self {
        let mut session = Self {
            projector,
            key: None,
            baseline: R::default(),
            working: R::default(),
            touched: FieldsSet::empty(R::fields().len()),
        };
        session.sync();
        session
    }

    /// Re-read the baseline and reconcile the working copy with it.
    pub fn sync(&mut self) -> SyncOutcome {
        match self.projector.project() {
            None => {
                if self.key.is_some() {
                    tracing::debug!(
                        key = ?self.key,
                        dropped = self.pending_len(),
                        "Baseline vanished, resetting working copy"
                    );
                }
                self.key = None;
                self.baseline = R::default();
                self.working = R::default();
                self.touched.clear();
                SyncOutcome::Vanished
            }
            Some(Baseline { key, fields }) if self.key.as_ref() != Some(&key) => {
                if self.key.is_some() {
                    tracing::debug!(
                        from = ?self.key,
                        to = ?key,
                        dropped = self.pending_len(),
                        "Entity changed, reinitializing working copy"
                    );
                }
                self.key = Some(key);
                self.working = fields.clone();
                self.baseline = fields;
                self.touched.clear();
                SyncOutcome::Reinitialized
            }
            Some(Baseline { fields, .. }) => self.rebase(fields),
        }
    }

    /// Same entity, possibly new committed values.
    fn rebase(&mut self, fields: R) -> SyncOutcome {
        let moved = fields.diff_against(&self.baseline);
        if moved.is_empty() {
            return SyncOutcome::Unchanged;
        }

        for (field, value) in moved.iter() {
            let Some(idx) = R::field_index(field) else {
                continue;
            };
            if self.touched.is_set(idx) {
                continue;
            }
            if let Err(e) = self.working.set(field, value.clone()) {
                tracing::warn!(field, error = %e, "Failed to carry baseline value into working copy");
            }
        }

        // A touched field the baseline has caught up with is no longer an override.
        let caught_up: Vec<usize> = self
            .touched
            .iter()
            .filter(|idx| {
                let field = R::fields()[*idx];
                self.working.get(field) == fields.get(field)
            })
            .collect();
        for idx in caught_up {
            self.touched.unset(idx);
        }

        tracing::debug!(
            key = ?self.key,
            moved = ?moved.fields(),
            overrides = self.touched.count(),
            "Baseline moved, rebased working copy"
        );
        self.baseline = fields;
        SyncOutcome::Rebased
    }

    fn pending_len(&self) -> usize {
        self.working.diff_against(&self.baseline).len()
    }

    /// Current working value of `field`.
    pub fn get(&mut self, field: &str) -> Option<Value> {
        self.sync();
        self.working.get(field)
    }

    /// Overwrite one working field. Other fields and the baseline are untouched.
    #[tracing::instrument(level = "debug", skip(self, value))]
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        self.sync();
        if self.key.is_none() {
            return Err(Error::EntityVanished(format!(
                "no baseline to edit field {}",
                field
            )));
        }
        let name = R::field_name(field)?;
        self.working.set(name, value)?;
        if let Some(idx) = R::field_index(name) {
            self.touched.set(idx);
        }
        Ok(())
    }

    /// Fields whose working value differs from the latest baseline, in
    /// declaration order, carrying the working values.
    pub fn diff(&mut self) -> Patch {
        self.sync();
        if self.key.is_none() {
            return Patch::new();
        }
        self.working.diff_against(&self.baseline)
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&mut self) -> bool {
        !self.diff().is_empty()
    }

    /// Throw away every edit and start over from the current baseline.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) {
        self.sync();
        self.working = self.baseline.clone();
        self.touched.clear();
    }

    /// Identity of the entity being edited, if it still exists.
    ///
    /// Reflects the last `sync()`.
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Whether the last `sync()` found no baseline.
    pub fn is_vanished(&self) -> bool {
        self.key.is_none()
    }

    /// The working copy as of the last `sync()`.
    pub fn working(&self) -> &R {
        &self.working
    }

    /// The baseline as of the last `sync()`.
    pub fn baseline(&self) -> &R {
        &self.baseline
    }

    /// Fields the user has overridden.
    pub fn touched(&self) -> &FieldsSet {
        &self.touched
    }

    /// The projector feeding this session.
    pub fn projector(&self) -> &P {
        &self.projector
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
