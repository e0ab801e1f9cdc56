//! Pending-edit tracking and bitmask permissions for chat settings forms.
//!
//! `chanform` is the facade crate: it re-exports the core types, the diff engine
//! and the workflows, and adds the channel settings form that ties them together.
//!
//! # Overview
//!
//! - `ChannelStore` holds committed channels and feeds baselines to forms.
//! - `ChannelSettings` keeps a working copy, turns permission checkboxes into
//!   mask edits, and saves only the fields that changed.
//! - `ChannelDeleteDialog` gates deletes behind typing the channel's name.
//!
//! # Example
//!
//! ```rust,ignore
//! use chanform::prelude::*;
//!
//! let mut form = ChannelSettings::for_channel(&store, "c1");
//! form.set_name("general-chat")?;
//! form.set_permission(2, true)?;
//! assert_eq!(form.diff().to_json_string()?, r#"{"name":"general-chat","permissions":4}"#);
//!
//! form.save(&cx, &service).await;
//! if let Some(message) = form.error() {
//!     show_error(message);
//! }
//! ```

pub mod config;
pub mod delete;
pub mod session;
pub mod settings;

pub use chanform_core::{
    Baseline, Channel, ChannelFields, ChannelKey, ChannelProjector, ChannelService,
    ChannelStore, Cx, Editable, Error, FieldsSet, Outcome, Patch, PermissionDescriptor,
    PermissionEntry, PermissionTable, Projector, Result, Value, ValueKind, clear_bit, has_bit,
    materialize, set_bit, settle, toggle_bit,
};
pub use chanform_core::permissions;
pub use config::SettingsConfig;
pub use delete::ChannelDeleteDialog;
pub use session::{
    CloseReason, DeleteConfirmation, DeleteState, EditSession, SaveFlow, SaveState, SyncOutcome,
};
pub use settings::{ChannelSettings, SaveRequest};

/// Everything a settings page usually needs.
pub mod prelude {
    pub use crate::{
        Channel, ChannelDeleteDialog, ChannelFields, ChannelKey, ChannelService, ChannelSettings,
        ChannelStore, CloseReason, Cx, DeleteState, Error, Outcome, Patch, PermissionDescriptor,
        PermissionTable, SaveState, SettingsConfig, Value,
    };
}
