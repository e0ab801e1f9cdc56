//! At-most-one-in-flight save state machine.
//!
//! `Idle -> Saving -> Idle | Failed(message)`. A `Failed` flow is idle for the
//! purpose of starting another save; it just still has an error to show.

use chanform_core::{Error, Patch};
use serde::Serialize;

/// Save progress for one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "camelCase")]
pub enum SaveState {
    /// Nothing in flight, nothing to report.
    Idle,
    /// A request is outstanding.
    Saving,
    /// The last request was rejected with this message.
    Failed(String),
}

/// Guards a form's save action.
///
/// # Example
///
/// ```ignore
/// if let Some(payload) = flow.begin(session.diff()) {
///     let result = settle(service.update_channel(&cx, &key, &payload).await);
///     flow.finish(result);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SaveFlow {
    state: SaveState,
    /// Number of requests started.
    attempts: u64,
}

impl Default for SaveFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SaveFlow {
    /// A flow in `Idle`.
    pub fn new() -> Self {
        Self {
            state: SaveState::Idle,
            attempts: 0,
        }
    }

    /// Try to start a save of `patch`.
    ///
    /// Returns the payload to send, or `None` when a save is already in flight
    /// or there is nothing to save. Starting clears any previous error.
    pub fn begin(&mut self, patch: Patch) -> Option<Patch> {
        if self.is_saving() {
            tracing::debug!("Save already in flight, ignoring");
            return None;
        }
        if patch.is_empty() {
            tracing::debug!("Nothing to save");
            return None;
        }
        self.state = SaveState::Saving;
        self.attempts += 1;
        tracing::info!(
            fields = ?patch.fields(),
            attempt = self.attempts,
            "Starting save"
        );
        Some(patch)
    }

    /// Record the result of the in-flight request.
    ///
    /// Results arriving while no save is in flight are ignored.
    pub fn finish(&mut self, result: Result<(), Error>) -> &SaveState {
        if !self.is_saving() {
            tracing::warn!("Save result arrived with no save in flight, ignoring");
            return &self.state;
        }
        self.state = match result {
            Ok(()) => {
                tracing::info!(attempt = self.attempts, "Save completed");
                SaveState::Idle
            }
            Err(e) => {
                let mut message = e.user_message();
                if message.is_empty() {
                    message = "save failed".to_string();
                }
                tracing::warn!(attempt = self.attempts, error = %message, "Save failed");
                SaveState::Failed(message)
            }
        };
        &self.state
    }

    /// Current state.
    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn is_saving(&self) -> bool {
        self.state == SaveState::Saving
    }

    /// Error from the last save, if it failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SaveState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Forget a displayed error without starting a save.
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, SaveState::Failed(_)) {
            self.state = SaveState::Idle;
        }
    }

    /// Number of requests started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }
}
