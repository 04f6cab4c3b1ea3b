//! Shutdown coordination
//!
//! A single watch channel carries the first shutdown reason to the accept
//! loop and every connection task. Later triggers are ignored.

use std::sync::Arc;
use tokio::sync::watch;

/// Why the server stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / SIGTERM
    Signal,
    /// `POST /app/kill`
    Kill,
}

impl ShutdownReason {
    /// Process exit code for this reason
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Signal => 0,
            Self::Kill => 1,
        }
    }
}

/// Cloneable handle shared by the signal task, the kill handler and the server
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown; returns false if it was already requested
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ShutdownReason>> {
        self.tx.subscribe()
    }

    /// Wait until shutdown is requested
    pub async fn requested(&self) -> ShutdownReason {
        let mut rx = self.subscribe();
        // the sender lives in `self`, so the channel cannot close here
        let reason = match rx.wait_for(Option::is_some).await {
            Ok(reason) => *reason,
            Err(_) => None,
        };
        reason.unwrap_or(ShutdownReason::Signal)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
