//! Graceful shutdown of the gateway.
//!
//! The trigger is latched: a listener subscribed after shutdown began still
//! observes it, so a server started late stops immediately.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::lifecycle::signals::wait_for_signal;

/// Owner of the shutdown trigger.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Begin shutdown. Only the first call is logged.
    pub fn trigger(&self, reason: &str) {
        if !self.tx.send_replace(true) {
            tracing::info!(reason = %reason, "Graceful shutdown initiated");
        }
    }

    /// Hand the trigger to a task that fires it on SIGINT or SIGTERM.
    pub fn trigger_on_signal(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let signal = wait_for_signal().await;
            self.trigger(signal);
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side held by the HTTP server.
#[derive(Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once shutdown has been triggered or the trigger was dropped.
    pub async fn triggered(mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
