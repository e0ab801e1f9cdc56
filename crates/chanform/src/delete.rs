//! Channel delete dialog.
//!
//! Wraps the generic `DeleteConfirmation` with a baseline projector, the remote
//! service and the post-delete route. Like `EditSession`, the dialog pulls the
//! committed channel on every read, so the guard always checks the current
//! name and a channel removed elsewhere closes the dialog before any request.

use asupersync::Cx;
use chanform_core::{
    ChannelFields, ChannelKey, ChannelProjector, ChannelService, Error, Projector, Result, settle,
};
use chanform_session::{DeleteConfirmation, DeleteState};

use crate::config::SettingsConfig;

/// One open "delete channel" dialog.
#[derive(Debug, Clone)]
pub struct ChannelDeleteDialog<P = ChannelProjector>
where
    P: Projector<ChannelKey, ChannelFields>,
{
    projector: P,
    inner: DeleteConfirmation<ChannelKey>,
    config: SettingsConfig,
}

impl<P> ChannelDeleteDialog<P>
where
    P: Projector<ChannelKey, ChannelFields>,
{
    /// Open a dialog for the channel `projector` currently yields.
    ///
    /// `None` when the channel no longer exists.
    pub fn open(projector: P, config: SettingsConfig) -> Option<Self> {
        let baseline = projector.project()?;
        Some(Self {
            inner: DeleteConfirmation::open(baseline.key, baseline.fields.name),
            projector,
            config,
        })
    }

    /// Re-read the channel. Closes the dialog if it is gone; a rename moves
    /// the confirmation guard to the new name.
    pub fn observe(&mut self) -> DeleteState {
        let current = self
            .projector
            .project()
            .filter(|baseline| &baseline.key == self.inner.key());
        self.inner
            .observe(current.as_ref().map(|b| b.fields.name.as_str()))
    }

    /// Dialog title, e.g. "Delete rules".
    pub fn title(&mut self) -> String {
        self.observe();
        format!("{}{}", self.config.delete_title_prefix, self.inner.name())
    }

    /// Update the confirmation text.
    pub fn input(&mut self, text: impl Into<String>) {
        self.inner.input(text);
    }

    /// Whether the delete button is enabled.
    pub fn can_confirm(&mut self) -> bool {
        self.observe();
        self.inner.can_confirm()
    }

    /// Press delete. See `DeleteConfirmation::confirm`.
    pub fn confirm(&mut self) -> Result<Option<ChannelKey>> {
        self.observe();
        self.inner.confirm()
    }

    /// Record the delete result; returns the route to navigate to on success.
    pub fn finish(&mut self, result: std::result::Result<(), Error>) -> Option<String> {
        if self.inner.finish(result) {
            Some(
                self.config
                    .channel_list_path(&self.inner.key().server_id),
            )
        } else {
            None
        }
    }

    /// Confirm, send the delete, and record the answer.
    ///
    /// Returns the route to navigate to once the channel is gone, `Ok(None)`
    /// if nothing was sent or the delete failed (see `error()`), and
    /// `Error::ValidationGate` if the confirmation text does not match.
    #[tracing::instrument(level = "debug", skip(self, cx, service))]
    pub async fn confirm_and_delete<S: ChannelService>(
        &mut self,
        cx: &Cx,
        service: &S,
    ) -> Result<Option<String>> {
        let Some(key) = self.confirm()? else {
            return Ok(None);
        };
        let outcome = service.delete_channel(cx, &key).await;
        Ok(self.finish(settle(outcome)))
    }

    /// Cancel the dialog.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    pub fn state(&mut self) -> DeleteState {
        self.observe()
    }

    pub fn is_closed(&mut self) -> bool {
        self.observe();
        self.inner.is_closed()
    }

    /// Inline error from the last failed delete.
    pub fn error(&self) -> Option<&str> {
        self.inner.error()
    }

    pub fn key(&self) -> &ChannelKey {
        self.inner.key()
    }

    pub fn typed(&self) -> &str {
        self.inner.typed()
    }
}
