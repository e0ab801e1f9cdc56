//! Remote channel operations consumed by settings forms.

use std::fmt::Debug;
use std::future::Future;

use asupersync::{Cx, Outcome};

use crate::channel::ChannelKey;
use crate::error::{Error, Result};
use crate::patch::Patch;

/// Server-side operations on channels.
///
/// Implementations own the transport. They are expected to reflect accepted
/// changes into the `ChannelStore` eventually (from the response or a later
/// push); forms never write to the store themselves.
pub trait ChannelService: Send + Sync {
    /// Apply `patch` to the channel. Rejections carry a user-facing message.
    fn update_channel(
        &self,
        cx: &Cx,
        key: &ChannelKey,
        patch: &Patch,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// Delete the channel.
    fn delete_channel(
        &self,
        cx: &Cx,
        key: &ChannelKey,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;
}

/// Collapse a remote outcome into a plain result.
///
/// Cancellation and panics become `Error::Remote` with a non-empty message so
/// nothing fails silently.
pub fn settle<T>(outcome: Outcome<T, Error>) -> Result<T> {
    match outcome {
        Outcome::Ok(v) => Ok(v),
        Outcome::Err(Error::Remote(msg)) if msg.is_empty() => {
            Err(Error::Remote("request failed".to_string()))
        }
        Outcome::Err(e) => Err(e),
        Outcome::Cancelled(r) => Err(interrupted("cancelled", &r)),
        Outcome::Panicked(p) => Err(interrupted("panicked", &p)),
    }
}

/// Error for a request that never produced an answer.
fn interrupted(how: &str, detail: &dyn Debug) -> Error {
    let err = Error::Remote(format!("request {how}: {detail:?}"));
    tracing::warn!(error = %err, "Remote request interrupted");
    err
}
