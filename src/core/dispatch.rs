//! # Dispatch
//!
//! Background tasks never touch `App` directly. They send `Action`s to the
//! event loop through a [`Dispatcher`], which refuses to send once the chat
//! has been torn down.
//!
//! Teardown is a [`CancellationToken`]: the event loop cancels it on exit and
//! every clone of the dispatcher sees it immediately. In-flight network calls
//! are not aborted; whatever they produce afterwards is dropped here.

use std::sync::mpsc::Sender;

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::core::action::Action;

#[derive(Clone)]
pub struct Dispatcher {
    sender: Sender<Action>,
    lifetime: CancellationToken,
}

impl Dispatcher {
    pub fn new(sender: Sender<Action>, lifetime: CancellationToken) -> Self {
        Self { sender, lifetime }
    }

    /// Sends `action` to the event loop unless the chat is torn down.
    /// Returns false if the action was discarded.
    pub fn dispatch(&self, action: Action) -> bool {
        if self.lifetime.is_cancelled() {
            debug!("Discarding {:?}: chat torn down", action);
            return false;
        }
        if self.sender.send(action).is_err() {
            warn!("Failed to dispatch action: receiver dropped");
            return false;
        }
        true
    }

    /// The teardown token, for `select!`ing against long waits.
    pub fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }
}
