/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! User-visible notices and the change notification bus.
//!
//! The bus is a single process-wide "the tree may have changed"
//! signal with no payload: every structural mutation and explicit
//! refresh fires it, and the host re-derives the whole hierarchy from
//! the root. Individual operations already confirm success or failure
//! synchronously through [`Notifier`], so the bus never needs to say
//! what changed.

use tokio::sync::watch;

/// Sink for notices the host shows to the user.
///
/// Empty-but-valid results go through `info`; failures and rejected
/// edits go through `error`. The host typically maps these onto its
/// own notification surface.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default notifier for headless hosts: forwards notices to the
/// process log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "suitetree::notice", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "suitetree::notice", "{}", message);
    }
}

/// The change notification bus.
///
/// Internally a monotonically increasing version counter on a watch
/// channel; listeners wake on any version bump. Cloning shares the
/// same channel.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: watch::Sender<u64>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Fire the "tree may have changed" signal. No payload, no
    /// target: subscribers re-render from the root.
    pub fn fire(&self) {
        self.tx.send_modify(|version| *version += 1);
    }

    /// Number of times the signal has fired.
    pub fn version(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ChangeListener {
        ChangeListener {
            rx: self.tx.subscribe(),
        }
    }
}

/// One subscriber's view of the bus.
#[derive(Debug, Clone)]
pub struct ChangeListener {
    rx: watch::Receiver<u64>,
}

impl ChangeListener {
    /// Wait until the signal fires again, returning the new version.
    /// Resolves immediately if it already fired since the last call.
    pub async fn changed(&mut self) -> u64 {
        // The sender lives as long as the bus; a closed channel just
        // means no more changes are coming.
        let _ = self.rx.changed().await;
        *self.rx.borrow_and_update()
    }

    pub fn version(&self) -> u64 {
        *self.rx.borrow()
    }
}
