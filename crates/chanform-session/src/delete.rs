//! Delete-confirmation state machine for one dialog instance.
//!
//! `Open -> Confirmed -> Closed`. The user must type the entity's current
//! display name exactly (case-sensitive) before a delete may be issued. The
//! dialog closes itself when the entity disappears from the store.

use std::fmt::Debug;

use chanform_core::Error;
use serde::Serialize;

/// Why a dialog closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CloseReason {
    /// The user dismissed it.
    Cancelled,
    /// The delete succeeded.
    Deleted,
    /// The entity disappeared while the dialog was up.
    Vanished,
}

/// Dialog state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteState {
    /// Waiting for confirmation text.
    Open,
    /// Delete request in flight.
    Confirmed,
    /// Done; the dialog should be torn down.
    Closed(CloseReason),
}

/// One delete-confirmation dialog, owned by whoever opened it.
#[derive(Debug, Clone)]
pub struct DeleteConfirmation<K> {
    key: K,
    /// Current display name; the confirmation text must equal it.
    name: String,
    typed: String,
    state: DeleteState,
    error: Option<String>,
}

impl<K: Clone + Debug> DeleteConfirmation<K> {
    /// Open a dialog for the entity `key` currently named `name`.
    pub fn open(key: K, name: impl Into<String>) -> Self {
        let name = name.into();
        tracing::debug!(key = ?key, name = %name, "Opening delete confirmation");
        Self {
            key,
            name,
            typed: String::new(),
            state: DeleteState::Open,
            error: None,
        }
    }

    /// Update the confirmation text. Ignored unless the dialog is open.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.state == DeleteState::Open {
            self.typed = text.into();
        }
    }

    /// Whether the confirm action is enabled.
    pub fn can_confirm(&self) -> bool {
        self.state == DeleteState::Open && self.typed == self.name
    }

    /// Press the confirm action.
    ///
    /// Returns the key to delete when the request should be issued, `Ok(None)`
    /// when one is already in flight or the dialog is closed, and
    /// `Error::ValidationGate` when the typed text does not match.
    pub fn confirm(&mut self) -> Result<Option<K>, Error> {
        match self.state {
            DeleteState::Confirmed | DeleteState::Closed(_) => Ok(None),
            DeleteState::Open if self.typed != self.name => Err(Error::ValidationGate {
                expected_len: self.name.chars().count(),
                typed: self.typed.clone(),
            }),
            DeleteState::Open => {
                self.state = DeleteState::Confirmed;
                self.error = None;
                tracing::info!(key = ?self.key, "Delete confirmed");
                Ok(Some(self.key.clone()))
            }
        }
    }

    /// Record the result of the delete request.
    ///
    /// Returns `true` when the entity is gone and the caller should navigate
    /// away from it. A failure reopens the dialog with the error shown.
    pub fn finish(&mut self, result: Result<(), Error>) -> bool {
        match (self.state, result) {
            (DeleteState::Confirmed, Ok(())) => {
                tracing::info!(key = ?self.key, "Delete completed");
                self.state = DeleteState::Closed(CloseReason::Deleted);
                true
            }
            (DeleteState::Confirmed, Err(e)) => {
                let mut message = e.user_message();
                if message.is_empty() {
                    message = "delete failed".to_string();
                }
                tracing::warn!(key = ?self.key, error = %message, "Delete failed");
                self.error = Some(message);
                self.state = DeleteState::Open;
                false
            }
            // The dialog already closed because the entity vanished; a late
            // success still means there is nothing left to show.
            (DeleteState::Closed(CloseReason::Vanished), Ok(())) => true,
            (state, Err(e)) => {
                tracing::warn!(
                    key = ?self.key,
                    ?state,
                    error = %e.user_message(),
                    "Delete failed after the dialog closed"
                );
                false
            }
            (state, Ok(())) => {
                tracing::debug!(?state, "Delete result arrived outside a request, ignoring");
                false
            }
        }
    }

    /// Re-read the entity: `None` when it no longer exists, otherwise its
    /// current display name.
    pub fn observe(&mut self, current_name: Option<&str>) -> DeleteState {
        match (self.state, current_name) {
            (DeleteState::Closed(_), _) => {}
            (_, None) => {
                tracing::debug!(key = ?self.key, "Entity vanished, closing delete confirmation");
                self.state = DeleteState::Closed(CloseReason::Vanished);
            }
            (_, Some(name)) if name != self.name => {
                tracing::debug!(key = ?self.key, from = %self.name, to = %name, "Entity renamed");
                self.name = name.to_string();
            }
            _ => {}
        }
        self.state
    }

    /// Dismiss the dialog.
    pub fn cancel(&mut self) {
        if !self.is_closed() {
            self.state = DeleteState::Closed(CloseReason::Cancelled);
        }
    }

    pub fn state(&self) -> DeleteState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, DeleteState::Closed(_))
    }

    /// Inline error from the last failed attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Name the confirmation text must match.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }
}
