//! Core types and traits for chanform.
//!
//! `chanform-core` is the **foundation layer** for the settings-form stack. It defines
//! the data types and contracts the session and facade crates build on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Editable` is implemented by every record a settings form can
//!   edit; `ChannelService` is implemented by whatever talks to the server.
//! - **Data model**: `Value` and `Patch` carry field values and minimal change sets;
//!   `Channel`, `ChannelFields` and `ChannelKey` describe the channel domain.
//! - **Permissions**: `permissions` holds the pure bitmask functions and the injected
//!   `PermissionTable`.
//! - **Store**: `ChannelStore` is the shared committed-record store that baselines are
//!   projected from.
//! - **Structured concurrency**: re-exports `Cx` and `Outcome` from asupersync so every
//!   remote operation is cancel-correct.
//!
//! Most applications should use the `chanform` facade; reach for `chanform-core`
//! directly when implementing a `ChannelService` or a new `Editable` record.

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod channel;
pub mod error;
pub mod fields_set;
pub mod patch;
pub mod permissions;
pub mod record;
pub mod service;
pub mod store;
pub mod value;

pub use channel::{Channel, ChannelFields, ChannelKey};
pub use error::{Error, Result};
pub use fields_set::FieldsSet;
pub use patch::Patch;
pub use permissions::{
    PermissionDescriptor, PermissionEntry, PermissionTable, clear_bit, has_bit, materialize,
    set_bit, toggle_bit,
};
pub use record::{Baseline, Editable, Projector};
pub use service::{ChannelService, settle};
pub use store::{ChannelProjector, ChannelStore};
pub use value::{Value, ValueKind};
