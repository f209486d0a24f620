/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Hierarchy core for a remote test-management client.
//!
//! Renders a remote hierarchy (projects → suites → sections → test
//! cases, and projects → suites → runs → tests) as a lazily loaded
//! tree, and keeps that state consistent under drag-and-drop
//! reorganization and external mutation. The host UI (tree view,
//! detail panels) and the remote service are collaborators behind
//! traits; this crate decides what nodes exist, how they are fetched
//! on demand, how they are identified, and how structural edits
//! propagate.
//!
//! Invariants enforced throughout:
//! - **Fresh nodes per expansion**: child lists are rebuilt from the
//!   remote listing every time a node expands; nodes are never
//!   mutated in place, so a stale or duplicated subtree cannot
//!   survive a refresh.
//! - **Identity is `(kind, id)`**: the panel registry deduplicates
//!   detail panels by that key, and kinds never collide on equal ids.
//! - **Expansion boundary**: remote failures become notices and empty
//!   child lists; no error escapes to the host's renderer, and one
//!   broken branch cannot abort its siblings.
//! - **Cycle-safe ancestor walk**: section re-parenting is checked
//!   against the flat sibling list with a visited-set guard, so even
//!   a remotely corrupted `parent_id` chain terminates.
//! - **Single mutation funnel**: every mutation validates locally,
//!   calls the remote service, notifies, and on success fires the
//!   change bus exactly once. Failures fire nothing, leaving the tree
//!   in its last-known-good state.
//! - **Whole-tree refresh**: the change signal carries no payload;
//!   subscribers re-derive the hierarchy from the root rather than
//!   patching subtrees optimistically.

mod client;
mod config;
mod edit;
mod expand;
mod node;
mod notify;
mod panel;
mod record;
mod remote;

#[cfg(test)]
pub(crate) mod test_utils;

pub use client::HttpService;
pub use config::Settings;
pub use config::SettingsError;
pub use edit::DropPayload;
pub use edit::Editor;
pub use expand::Explorer;
pub use node::Node;
pub use node::NodeKey;
pub use node::NodeKind;
pub use node::is_descendant_of;
pub use node::sort_runs;
pub use node::sort_sections;
pub use notify::ChangeBus;
pub use notify::ChangeListener;
pub use notify::LogNotifier;
pub use notify::Notifier;
pub use panel::Panel;
pub use panel::PanelHost;
pub use panel::PanelMessage;
pub use panel::PanelRegistry;
pub use panel::panel_key;
pub use record::CaseDraft;
pub use record::CaseResult;
pub use record::CaseUpdate;
pub use record::Milestone;
pub use record::MilestoneDraft;
pub use record::Project;
pub use record::ResultDraft;
pub use record::Run;
pub use record::RunDraft;
pub use record::RunTest;
pub use record::RunUpdate;
pub use record::Section;
pub use record::SectionDraft;
pub use record::Status;
pub use record::Suite;
pub use record::SuiteDraft;
pub use record::TestCase;
pub use remote::RemoteError;
pub use remote::RemoteService;
