//! Channel settings form: rename, permission toggles, save, delete.
//!
//! `ChannelSettings` glues the diff engine to the permission model and the save
//! workflow. It is what a channel settings page holds for its lifetime.
//!
//! # Example
//!
//! ```rust,ignore
//! use chanform::prelude::*;
//!
//! let mut form = ChannelSettings::for_channel(&store, "c1");
//! form.set_name("general-chat")?;
//! form.set_permission(2, true)?;
//!
//! if form.can_save() {
//!     form.save(&cx, &service).await;
//! }
//! ```

use asupersync::Cx;
use chanform_core::{
    ChannelFields, ChannelKey, ChannelProjector, ChannelService, ChannelStore, Error, Patch,
    PermissionDescriptor, PermissionTable, Projector, Result, Value, settle, toggle_bit,
};
use chanform_session::{EditSession, SaveFlow, SaveState, SyncOutcome};

use crate::config::SettingsConfig;
use crate::delete::ChannelDeleteDialog;

/// A save ready to be sent: exactly the changed fields of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub key: ChannelKey,
    pub patch: Patch,
}

/// State behind one channel settings page.
pub struct ChannelSettings<P = ChannelProjector>
where
    P: Projector<ChannelKey, ChannelFields>,
{
    session: EditSession<ChannelKey, ChannelFields, P>,
    save: SaveFlow,
    table: PermissionTable,
    config: SettingsConfig,
}

impl ChannelSettings<ChannelProjector> {
    /// Form for `channel_id`, reading baselines from `store`.
    pub fn for_channel(store: &ChannelStore, channel_id: &str) -> Self {
        Self::new(store.projector(channel_id))
    }
}

impl<P> ChannelSettings<P>
where
    P: Projector<ChannelKey, ChannelFields>,
{
    /// Form with the channel permission table and default configuration.
    pub fn new(projector: P) -> Self {
        Self::with_config(
            projector,
            PermissionTable::channel(),
            SettingsConfig::default(),
        )
    }

    /// Form with an explicit permission table and configuration.
    pub fn with_config(projector: P, table: PermissionTable, config: SettingsConfig) -> Self {
        Self {
            session: EditSession::new(projector),
            save: SaveFlow::new(),
            table,
            config,
        }
    }

    // ========================================================================
    // Baseline
    // ========================================================================

    /// Re-read the committed channel.
    pub fn sync(&mut self) -> SyncOutcome {
        self.session.sync()
    }

    /// Whether the channel still exists. Hide the form when it does not.
    pub fn is_available(&mut self) -> bool {
        self.session.sync() != SyncOutcome::Vanished
    }

    /// Channel being edited.
    pub fn key(&mut self) -> Option<ChannelKey> {
        self.session.sync();
        self.session.key().cloned()
    }

    /// Page header: the configured prefix plus the committed channel name.
    pub fn header_title(&mut self) -> String {
        self.session.sync();
        format!("{}{}", self.config.title_prefix, self.session.baseline().name)
    }

    // ========================================================================
    // Fields
    // ========================================================================

    /// Working value of any field.
    pub fn get(&mut self, field: &str) -> Option<Value> {
        self.session.get(field)
    }

    /// Write any field.
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        self.session.set(field, value)
    }

    /// Working channel name.
    pub fn name(&mut self) -> String {
        self.session
            .get(ChannelFields::NAME)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Rename in the working copy.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.session
            .set(ChannelFields::NAME, Value::Text(name.into()))
    }

    /// Working permission mask.
    pub fn permission_mask(&mut self) -> u64 {
        self.session
            .get(ChannelFields::PERMISSIONS)
            .and_then(|v| v.as_mask())
            .unwrap_or_default()
    }

    /// One descriptor per known permission for the working mask.
    pub fn permissions(&mut self) -> Vec<PermissionDescriptor> {
        let mask = self.permission_mask();
        self.table.materialize(mask)
    }

    /// Checkbox toggle for permission `bit`.
    ///
    /// Bits outside the table are left exactly as they were.
    pub fn set_permission(&mut self, bit: u32, checked: bool) -> Result<()> {
        let mask = self.permission_mask();
        let updated = toggle_bit(mask, bit, checked);
        tracing::debug!(bit, checked, from = mask, to = updated, "Permission toggled");
        self.session
            .set(ChannelFields::PERMISSIONS, Value::Mask(updated))
    }

    /// Discard every unsaved edit.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Changed fields.
    pub fn diff(&mut self) -> Patch {
        self.session.diff()
    }

    /// Whether there is anything to save. The save action is shown only then.
    pub fn has_changes(&mut self) -> bool {
        self.session.is_dirty()
    }

    /// Whether pressing save would send a request.
    pub fn can_save(&mut self) -> bool {
        !self.save.is_saving() && self.has_changes()
    }

    /// Start a save. `None` when one is in flight or nothing changed.
    ///
    /// Edits made before `finish_save` go into the next save, not this one.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        let patch = self.session.diff();
        let key = self.session.key()?.clone();
        let patch = self.save.begin(patch)?;
        Some(SaveRequest { key, patch })
    }

    /// Record the outcome of the request returned by `begin_save`.
    ///
    /// The working copy is never touched here; the diff empties once the store
    /// reflects the saved values.
    pub fn finish_save(&mut self, result: std::result::Result<(), Error>) -> &SaveState {
        self.save.finish(result)
    }

    /// Send the current diff through `service` and wait for the answer.
    pub async fn save<S: ChannelService>(&mut self, cx: &Cx, service: &S) -> &SaveState {
        let Some(request) = self.begin_save() else {
            return self.save.state();
        };
        tracing::debug!(channel = %request.key, "Sending channel update");
        let outcome = service
            .update_channel(cx, &request.key, &request.patch)
            .await;
        self.save.finish(settle(outcome))
    }

    pub fn save_state(&self) -> &SaveState {
        self.save.state()
    }

    /// Error from the last failed save.
    pub fn error(&self) -> Option<&str> {
        self.save.error()
    }

    /// Label key for the save button.
    pub fn save_label(&self) -> &str {
        if self.save.is_saving() {
            &self.config.saving_label
        } else {
            &self.config.save_label
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    /// The underlying diff engine.
    pub fn session(&self) -> &EditSession<ChannelKey, ChannelFields, P> {
        &self.session
    }
}

impl<P> ChannelSettings<P>
where
    P: Projector<ChannelKey, ChannelFields> + Clone,
{
    /// Open a delete confirmation for the committed channel.
    ///
    /// The dialog reads the channel through its own copy of the projector.
    pub fn open_delete(&mut self) -> Option<ChannelDeleteDialog<P>> {
        self.session.sync();
        self.session.key()?;
        ChannelDeleteDialog::open(self.session.projector().clone(), self.config.clone())
    }
}
