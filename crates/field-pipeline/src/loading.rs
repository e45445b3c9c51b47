//! Loading flag shared by overlapping pipeline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::debug;

/// Tracks in-flight runs and exposes "anything loading?" as a watch channel.
///
/// Receivers only see transitions: `true` when the first run starts and
/// `false` once the last one has finished, whatever the outcome.
#[derive(Debug)]
pub struct LoadingState {
    in_flight: AtomicUsize,
    tx: watch::Sender<bool>,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            in_flight: AtomicUsize::new(0),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Mark a run as started; the returned guard ends it on drop.
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.refresh();
        LoadingGuard { state: self }
    }

    // The counter is re-read inside the channel's lock, so concurrent
    // begin/end calls always settle on the value matching the final count.
    fn refresh(&self) {
        let changed = self.tx.send_if_modified(|loading| {
            let busy = self.in_flight.load(Ordering::SeqCst) > 0;
            if *loading != busy {
                *loading = busy;
                true
            } else {
                false
            }
        });

        if changed {
            debug!(loading = *self.tx.borrow(), "Loading state changed");
        }
    }
}

/// Ends one run when dropped, including on error, panic or cancellation.
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    state: &'a LoadingState,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.state.refresh();
    }
}
