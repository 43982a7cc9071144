//! Broadcast wakeup for many concurrent waiters
//!
//! A [`Notice`] lets any number of tasks park until a shared event fires
//! (new data, shutdown) while each one can still be woken early by its own
//! kick signal.
//!
//! ```text
//!   wait(kick) ──► oneshot<bool> ◄── false  on notice.alert()
//!                                ◄── true   on kick fired
//! ```
//!
//! Every waiter receives exactly one value. An alert only reaches waiters
//! registered before it; it is not remembered for later `wait` calls.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tracing::{debug, trace, warn};

/// Per-waiter cancellation signal. Fires once the value is `true` or the
/// sending side is dropped.
pub type Kick = watch::Receiver<bool>;

#[derive(Debug, Default)]
struct Waiters {
    next_id: u64,
    pending: HashMap<u64, oneshot::Sender<()>>,
}

/// One-to-many wakeup primitive
///
/// `Notice::default()` is ready to use. Clones share the same set of
/// waiters. Every waiter is held by its own task on the current tokio
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct Notice {
    waiters: Arc<Mutex<Waiters>>,
}

enum Outcome {
    Alerted,
    Kicked,
    Abandoned,
}

impl Notice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a waiter and return the receiver its result arrives on
    ///
    /// Resolves to `false` on the next [`Notice::alert`] or `true` when
    /// `kick` fires, whichever happens first. With no kick the waiter can only
    /// be woken by an alert.
    ///
    /// Outside a tokio runtime nothing is registered and the receiver is
    /// already closed.
    pub fn wait(&self, kick: Option<Kick>) -> oneshot::Receiver<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let Ok(runtime) = Handle::try_current() else {
            warn!("notice wait called outside a tokio runtime");
            return reply_rx;
        };
        let (alert_tx, alert_rx) = oneshot::channel();

        let id = {
            let mut waiters = self.waiters.lock();
            let id = waiters.next_id;
            waiters.next_id = waiters.next_id.wrapping_add(1);
            waiters.pending.insert(id, alert_tx);
            id
        };

        runtime.spawn(hold(
            id,
            Arc::downgrade(&self.waiters),
            alert_rx,
            kick,
            reply_tx,
        ));
        reply_rx
    }

    /// Wake every currently registered waiter with `false`
    pub fn alert(&self) {
        let woken: Vec<oneshot::Sender<()>> = {
            let mut waiters = self.waiters.lock();
            waiters.pending.drain().map(|(_, tx)| tx).collect()
        };
        if woken.is_empty() {
            return;
        }
        debug!("alerting {} waiters", woken.len());
        for tx in woken {
            // The holding task may already have been kicked.
            let _ = tx.send(());
        }
    }

    /// Number of waiters that have not been woken yet
    pub fn pending(&self) -> usize {
        self.waiters.lock().pending.len()
    }
}

async fn hold(
    id: u64,
    waiters: Weak<Mutex<Waiters>>,
    mut alert_rx: oneshot::Receiver<()>,
    kick: Option<Kick>,
    mut reply_tx: oneshot::Sender<bool>,
) {
    let kicked = async move {
        match kick {
            Some(mut kick) => {
                // A dropped sender counts as fired.
                let _ = kick.wait_for(|fired| *fired).await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    // An alert error means every Notice handle is gone, which is a final wake.
    let outcome = tokio::select! {
        biased;
        _ = &mut alert_rx => Outcome::Alerted,
        _ = kicked => Outcome::Kicked,
        _ = reply_tx.closed() => Outcome::Abandoned,
    };

    match outcome {
        Outcome::Alerted => {
            let _ = reply_tx.send(false);
        }
        Outcome::Kicked => {
            deregister(&waiters, id);
            let _ = reply_tx.send(true);
        }
        Outcome::Abandoned => {
            trace!("waiter {} dropped its receiver", id);
            deregister(&waiters, id);
        }
    }
}

fn deregister(waiters: &Weak<Mutex<Waiters>>, id: u64) {
    if let Some(waiters) = waiters.upgrade() {
        waiters.lock().pending.remove(&id);
    }
}
