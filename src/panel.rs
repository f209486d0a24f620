/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The panel registry: at most one open detail panel per
//! `(entity kind, entity id)` pair.
//!
//! The registry is an owned service instance, not a process-wide
//! static; whoever needs to open panels holds (or is handed) the
//! instance, and the one-panel-per-entity contract is an invariant of
//! its internal map. Disposed panels are deregistered before any
//! lookup or push can target them, so pushing to a panel the user has
//! closed is impossible by construction.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::node::NodeKind;

/// Messages exchanged between the host and a panel's display surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PanelMessage {
    /// Panel → host: the display surface finished loading.
    Ready,
    /// Host → panel: first data push after `Ready`.
    Init {
        view_kind: NodeKind,
        data: serde_json::Value,
    },
    /// Host → panel: replace the displayed data in place.
    Update { data: serde_json::Value },
}

/// A live detail panel owned by the host.
pub trait Panel {
    /// Bring the panel to the foreground.
    fn reveal(&mut self);
    /// Deliver a message to the panel's display surface.
    fn post(&mut self, message: &PanelMessage);
    /// Whether the user has closed the panel.
    fn is_disposed(&self) -> bool;
}

/// The host side of panel creation. Creation, focus, and message
/// passing are the host's machinery; the registry only decides when
/// to create versus reuse.
pub trait PanelHost {
    fn create_panel(&mut self, key: &str, title: &str) -> Box<dyn Panel>;
}

/// Composite panel key. Kinds never collide even with numerically
/// equal ids.
pub fn panel_key(kind: NodeKind, id: u64) -> String {
    format!("{}:{}", kind, id)
}

struct PanelEntry {
    panel: Box<dyn Panel>,
    kind: NodeKind,
    /// Payload to deliver with `Init` once the panel reports `Ready`.
    pending: serde_json::Value,
    initialized: bool,
}

/// Deduplicates detail panels by `(kind, id)`.
pub struct PanelRegistry {
    host: Box<dyn PanelHost>,
    panels: HashMap<String, PanelEntry>,
}

impl PanelRegistry {
    pub fn new(host: Box<dyn PanelHost>) -> Self {
        Self {
            host,
            panels: HashMap::new(),
        }
    }

    /// Open a detail panel for `(kind, id)`, or bring the existing
    /// one to the foreground and push `payload` to it.
    ///
    /// A newly created panel receives nothing until its first `Ready`
    /// arrives via [`Self::on_panel_message`], which answers with an
    /// `Init` carrying `(kind, payload)`.
    pub fn open_or_focus(
        &mut self,
        kind: NodeKind,
        id: u64,
        title: &str,
        payload: serde_json::Value,
    ) {
        self.prune_disposed();
        let key = panel_key(kind, id);
        if let Some(entry) = self.panels.get_mut(&key) {
            entry.panel.reveal();
            entry.panel.post(&PanelMessage::Update { data: payload });
            return;
        }
        tracing::debug!(%key, title, "creating panel");
        let panel = self.host.create_panel(&key, title);
        self.panels.insert(
            key,
            PanelEntry {
                panel,
                kind,
                pending: payload,
                initialized: false,
            },
        );
    }

    /// The existing panel handle for `(kind, id)`, if one is open.
    /// Used by mutation handlers to refresh an already-open panel's
    /// content without creating a duplicate.
    pub fn get(&mut self, kind: NodeKind, id: u64) -> Option<&mut dyn Panel> {
        self.prune_disposed();
        match self.panels.get_mut(&panel_key(kind, id)) {
            Some(entry) => Some(entry.panel.as_mut()),
            None => None,
        }
    }

    /// Push an `Update` to the panel for `(kind, id)` if it is open;
    /// a closed or never-opened panel is a no-op.
    pub fn push_update(&mut self, kind: NodeKind, id: u64, data: serde_json::Value) {
        if let Some(panel) = self.get(kind, id) {
            panel.post(&PanelMessage::Update { data });
        }
    }

    /// Handle a message arriving from a panel's display surface.
    ///
    /// The first `Ready` is answered with the pending `Init`;
    /// repeated `Ready` signals and messages for unknown keys (the
    /// panel may have been disposed meanwhile) are ignored.
    pub fn on_panel_message(&mut self, kind: NodeKind, id: u64, message: PanelMessage) {
        self.prune_disposed();
        if message != PanelMessage::Ready {
            return;
        }
        if let Some(entry) = self.panels.get_mut(&panel_key(kind, id)) {
            if !entry.initialized {
                entry.initialized = true;
                entry.panel.post(&PanelMessage::Init {
                    view_kind: entry.kind,
                    data: entry.pending.clone(),
                });
            }
        }
    }

    /// Whether a panel for `(kind, id)` is currently open.
    pub fn is_open(&mut self, kind: NodeKind, id: u64) -> bool {
        self.prune_disposed();
        self.panels.contains_key(&panel_key(kind, id))
    }

    /// Number of currently open panels.
    pub fn open_count(&mut self) -> usize {
        self.prune_disposed();
        self.panels.len()
    }

    /// The disposal hook: drop every entry whose panel the user has
    /// closed. Runs before each lookup, so the key is gone before any
    /// further push could target it.
    fn prune_disposed(&mut self) {
        self.panels.retain(|_, entry| !entry.panel.is_disposed());
    }
}
