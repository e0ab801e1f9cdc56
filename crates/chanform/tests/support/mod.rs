#![allow(dead_code)]

use std::sync::Mutex;

use asupersync::runtime::RuntimeBuilder;
use chanform::prelude::*;

/// Service double that records every request and optionally commits accepted
/// changes to the store, the way a server push would.
#[derive(Debug, Default)]
pub struct RecordingService {
    pub store: ChannelStore,
    pub commit: bool,
    pub updates: Mutex<Vec<(ChannelKey, Patch)>>,
    pub deletes: Mutex<Vec<ChannelKey>>,
    pub fail_with: Mutex<Option<String>>,
    pub cancel_next: Mutex<bool>,
}

impl RecordingService {
    /// A service that writes accepted changes into `store`.
    pub fn committing(store: &ChannelStore) -> Self {
        Self {
            store: store.clone(),
            commit: true,
            ..Self::default()
        }
    }

    /// A service that records requests but never touches the store.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    /// Make the next request end as cancelled instead of answering.
    pub fn cancel_next(&self) {
        *self.cancel_next.lock().unwrap() = true;
    }

    pub fn updates(&self) -> Vec<(ChannelKey, Patch)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<ChannelKey> {
        self.deletes.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Option<String> {
        self.fail_with.lock().unwrap().take()
    }

    fn take_cancel(&self) -> bool {
        std::mem::take(&mut *self.cancel_next.lock().unwrap())
    }
}

impl ChannelService for RecordingService {
    fn update_channel(
        &self,
        _cx: &Cx,
        key: &ChannelKey,
        patch: &Patch,
    ) -> impl std::future::Future<Output = Outcome<(), Error>> + Send {
        self.updates
            .lock()
            .unwrap()
            .push((key.clone(), patch.clone()));
        let outcome = if self.take_cancel() {
            Outcome::Cancelled(asupersync::CancelReason::timeout())
        } else {
            self.answer_update(key, patch)
        };
        async move { outcome }
    }

    fn delete_channel(
        &self,
        _cx: &Cx,
        key: &ChannelKey,
    ) -> impl std::future::Future<Output = Outcome<(), Error>> + Send {
        self.deletes.lock().unwrap().push(key.clone());
        let outcome = if self.take_cancel() {
            Outcome::Cancelled(asupersync::CancelReason::timeout())
        } else {
            self.answer_delete(key)
        };
        async move { outcome }
    }
}

impl RecordingService {
    fn answer_update(&self, key: &ChannelKey, patch: &Patch) -> Outcome<(), Error> {
        match self.take_failure() {
            Some(message) => Outcome::Err(Error::Remote(message)),
            None => {
                if self.commit {
                    self.store
                        .apply_patch(&key.channel_id, patch)
                        .expect("commit patch");
                }
                Outcome::Ok(())
            }
        }
    }

    fn answer_delete(&self, key: &ChannelKey) -> Outcome<(), Error> {
        match self.take_failure() {
            Some(message) => Outcome::Err(Error::Remote(message)),
            None => {
                if self.commit {
                    self.store.remove(&key.channel_id);
                }
                Outcome::Ok(())
            }
        }
    }
}

/// A store holding channel `c1` named "general" in server "srv".
pub fn general_store() -> ChannelStore {
    let store = ChannelStore::new();
    store.insert(Channel::new("srv", "c1", "general", 0b0000));
    store
}

/// Run `f` to completion on a single-threaded runtime.
pub fn run<F: std::future::Future>(f: F) -> F::Output {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    rt.block_on(f)
}
