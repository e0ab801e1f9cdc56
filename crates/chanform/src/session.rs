//! Diff-engine and workflow re-exports.
//!
//! `chanform::session` exposes the generic building blocks behind
//! `ChannelSettings`: the working-copy `EditSession` and the save/delete state
//! machines. The implementation lives in the separate `chanform-session` crate;
//! this module exists so forms for other entities can be built without
//! depending on sub-crates directly.

pub use chanform_session::{
    CloseReason, DeleteConfirmation, DeleteState, EditSession, SaveFlow, SaveState, SyncOutcome,
};
