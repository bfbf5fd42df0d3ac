//! One-shot gate that parks the program's main task until a callback
//! releases it.

use std::cell::RefCell;

use futures_channel::oneshot;
use futures_util::future::{FutureExt, Shared};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Waiting,
    Released,
}

/// Released exactly once. Every waiter, whether it started before or after
/// the release, resumes once the release has happened.
pub struct Gate {
    release_tx: RefCell<Option<oneshot::Sender<()>>>,
    released: Shared<oneshot::Receiver<()>>,
}

impl Gate {
    pub fn new() -> Self {
        let (release_tx, release_rx) = oneshot::channel();
        Self {
            release_tx: RefCell::new(Some(release_tx)),
            released: release_rx.shared(),
        }
    }

    pub fn state(&self) -> GateState {
        if self.release_tx.borrow().is_some() {
            GateState::Waiting
        } else {
            GateState::Released
        }
    }

    /// Resolves once the gate is released.
    pub async fn wait(&self) {
        // `Canceled` only happens when the sender is gone, which is a release too.
        let _ = self.released.clone().await;
    }

    /// Releases the gate. Returns `false`, and does nothing, if it was
    /// already released.
    pub fn release(&self) -> bool {
        let Some(release_tx) = self.release_tx.borrow_mut().take() else {
            return false;
        };
        // Fails only if every waiter future (and the gate's own copy) was
        // dropped; the gate still counts as released.
        let _ = release_tx.send(());
        true
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}
