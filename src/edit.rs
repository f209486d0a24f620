/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The structural mutation protocol: drag-and-drop re-parenting and
//! programmatic add/update/delete/close, with refresh propagation.
//!
//! Every mutation follows the same path: validate locally, call the
//! remote service, surface a success or failure notice, and on
//! success fire the change bus once. Refresh propagation is always
//! whole-tree; the hierarchy is re-derived from the remote source of
//! truth rather than patched optimistically, so no mutation here ever
//! edits a node in place.
//!
//! The only structural invariant enforced client-side is the
//! ancestor-cycle check on section re-parenting; all other validation
//! is delegated to the remote service's own business rules.

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::node::Node;
use crate::node::NodeKind;
use crate::node::is_descendant_of;
use crate::notify::ChangeBus;
use crate::notify::Notifier;
use crate::panel::PanelRegistry;
use crate::record::CaseDraft;
use crate::record::CaseUpdate;
use crate::record::MilestoneDraft;
use crate::record::ResultDraft;
use crate::record::Run;
use crate::record::RunDraft;
use crate::record::RunUpdate;
use crate::record::SectionDraft;
use crate::record::SuiteDraft;
use crate::remote::RemoteError;
use crate::remote::RemoteService;

/// Drag-and-drop transfer payload, as exchanged with the host's tree
/// view. The `type` tag discriminates the dragged entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DropPayload {
    Section {
        id: u64,
        suite_id: u64,
        project_id: u64,
    },
    TestCase {
        id: u64,
        section_id: u64,
        suite_id: u64,
    },
}

impl DropPayload {
    /// Decode a raw transfer value. Anything the tree doesn't
    /// understand decodes to `None` and is later swallowed; foreign
    /// drags are expected, not errors.
    pub fn parse(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Applies user-initiated structural edits and keeps the visible tree
/// consistent afterward.
pub struct Editor {
    service: Arc<dyn RemoteService>,
    notices: Arc<dyn Notifier>,
    bus: ChangeBus,
}

impl Editor {
    pub fn new(service: Arc<dyn RemoteService>, notices: Arc<dyn Notifier>, bus: ChangeBus) -> Self {
        Self {
            service,
            notices,
            bus,
        }
    }

    /// Handle a drop gesture onto `target`.
    ///
    /// Only a section is a valid drop target; any other combination
    /// (non-section target, unrecognized payload) is a silent no-op.
    /// Returns whether a refresh was fired.
    pub async fn handle_drop(&self, target: &Node, payload: Option<DropPayload>) -> bool {
        let Node::Section {
            section: target_section,
            siblings,
            ..
        } = target
        else {
            return false;
        };
        match payload {
            Some(DropPayload::Section { id, .. }) => {
                if id == target_section.id
                    || is_descendant_of(id, target_section.id, siblings)
                {
                    self.notices
                        .error("Cannot move a section beneath itself or its own descendant");
                    return false;
                }
                self.apply(
                    "Move section",
                    self.service.move_section(id, Some(target_section.id)),
                )
                .await
                .is_some()
            }
            Some(DropPayload::TestCase { id, .. }) => {
                // The target suite comes from the drop target, so a
                // case can cross suites when its section does.
                self.apply(
                    "Move test case",
                    self.service.move_cases_to_section(
                        &[id],
                        target_section.id,
                        target_section.suite_id,
                    ),
                )
                .await
                .is_some()
            }
            None => false,
        }
    }

    pub async fn add_suite(&self, project_id: u64, draft: SuiteDraft) -> bool {
        if !self.require_name(&draft.name, "suite") {
            return false;
        }
        self.apply("Add suite", self.service.add_suite(project_id, &draft))
            .await
            .is_some()
    }

    pub async fn add_section(&self, project_id: u64, draft: SectionDraft) -> bool {
        if !self.require_name(&draft.name, "section") {
            return false;
        }
        self.apply("Add section", self.service.add_section(project_id, &draft))
            .await
            .is_some()
    }

    pub async fn add_run(&self, project_id: u64, draft: RunDraft) -> bool {
        if !self.require_name(&draft.name, "run") {
            return false;
        }
        self.apply("Add run", self.service.add_run(project_id, &draft))
            .await
            .is_some()
    }

    pub async fn add_case(&self, draft: CaseDraft) -> bool {
        if !self.require_name(&draft.title, "test case") {
            return false;
        }
        self.apply("Add test case", self.service.add_case(draft.section_id, &draft))
            .await
            .is_some()
    }

    pub async fn add_milestone(&self, project_id: u64, draft: MilestoneDraft) -> bool {
        if !self.require_name(&draft.name, "milestone") {
            return false;
        }
        self.apply(
            "Add milestone",
            self.service.add_milestone(project_id, &draft),
        )
        .await
        .is_some()
    }

    pub async fn add_result(&self, test_id: u64, draft: ResultDraft) -> bool {
        self.apply("Add result", self.service.add_result(test_id, &draft))
            .await
            .is_some()
    }

    pub async fn update_run(&self, run: &Run, update: RunUpdate) -> bool {
        if self.reject_completed(run, "edit") {
            return false;
        }
        self.apply("Update run", self.service.update_run(run.id, &update))
            .await
            .is_some()
    }

    /// Update a test case. When a detail panel for the case is open,
    /// the refreshed record is pushed to it instead of opening a
    /// duplicate.
    pub async fn update_case(
        &self,
        case_id: u64,
        update: CaseUpdate,
        panels: Option<&mut PanelRegistry>,
    ) -> bool {
        let updated = self
            .apply("Update test case", self.service.update_case(case_id, &update))
            .await;
        match updated {
            Some(case) => {
                if let Some(panels) = panels {
                    if let Ok(data) = serde_json::to_value(&case) {
                        panels.push_update(NodeKind::Case, case_id, data);
                    }
                }
                true
            }
            None => false,
        }
    }

    pub async fn delete_suite(&self, suite_id: u64) -> bool {
        self.apply("Delete suite", self.service.delete_suite(suite_id))
            .await
            .is_some()
    }

    pub async fn delete_section(&self, section_id: u64) -> bool {
        self.apply("Delete section", self.service.delete_section(section_id))
            .await
            .is_some()
    }

    /// Delete a run. A completed run is not delete-eligible; the
    /// rejection happens before any remote call.
    pub async fn delete_run(&self, run: &Run) -> bool {
        if self.reject_completed(run, "delete") {
            return false;
        }
        self.apply("Delete run", self.service.delete_run(run.id))
            .await
            .is_some()
    }

    pub async fn delete_case(&self, case_id: u64) -> bool {
        self.apply("Delete test case", self.service.delete_case(case_id))
            .await
            .is_some()
    }

    pub async fn delete_milestone(&self, milestone_id: u64) -> bool {
        self.apply(
            "Delete milestone",
            self.service.delete_milestone(milestone_id),
        )
        .await
        .is_some()
    }

    /// Close a run. Closing an already-completed run is rejected
    /// before reaching the remote service.
    pub async fn close_run(&self, run: &Run) -> bool {
        if self.reject_completed(run, "close") {
            return false;
        }
        self.apply("Close run", self.service.close_run(run.id))
            .await
            .is_some()
    }

    /// Fire an explicit whole-tree refresh without any mutation.
    pub fn request_refresh(&self) {
        self.bus.fire();
    }

    /// The single mutation funnel: run the remote call, notify, and
    /// fire the bus on success. On failure no refresh fires, leaving
    /// the tree in its last-known-good state.
    async fn apply<T, F>(&self, op: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        match call.await {
            Ok(value) => {
                self.notices.info(&format!("{} succeeded", op));
                self.bus.fire();
                Some(value)
            }
            Err(err) => {
                tracing::warn!(operation = op, error = %err, "mutation failed");
                self.notices.error(&format!("{} failed: {}", op, err));
                None
            }
        }
    }

    /// Names are mandatory across every add prompt; a blank one
    /// blocks submission before any remote call.
    fn require_name(&self, name: &str, what: &str) -> bool {
        if name.trim().is_empty() {
            self.notices
                .error(&format!("A name is required to add a {}", what));
            return false;
        }
        true
    }

    /// Returns true (and surfaces a blocking error) when `run` is
    /// completed and therefore not eligible for `action`.
    fn reject_completed(&self, run: &Run, action: &str) -> bool {
        if run.is_completed {
            self.notices.error(&format!(
                "Run {} is completed; cannot {} a completed run",
                run.name, action
            ));
            return true;
        }
        false
    }
}
