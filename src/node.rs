/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The node model: a closed set of variants wrapping remote records
//! plus the tree context each one carries.
//!
//! Nodes are built fresh on every expansion and never mutated in
//! place; identity across rebuilds is the `(kind, id)` key. Expansion
//! and drag-drop behavior switch on the variant tag rather than
//! dispatching virtually, so the compiler checks every case.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::record::Project;
use crate::record::Run;
use crate::record::RunTest;
use crate::record::Section;
use crate::record::Suite;
use crate::record::TestCase;

/// Discriminator for node (and detail panel) identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Project,
    Suite,
    Section,
    RunsCategory,
    Run,
    Test,
    Case,
    Milestone,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeKind::Project => "project",
            NodeKind::Suite => "suite",
            NodeKind::Section => "section",
            NodeKind::RunsCategory => "runsCategory",
            NodeKind::Run => "run",
            NodeKind::Test => "test",
            NodeKind::Case => "case",
            NodeKind::Milestone => "milestone",
        };
        write!(f, "{}", s)
    }
}

/// Stable identity of a node: two nodes with the same key in the same
/// view are the same logical entity, even across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub id: u64,
}

/// One entry in the visible tree.
#[derive(Debug, Clone)]
pub enum Node {
    Project(Project),
    Suite {
        suite: Suite,
        project_id: u64,
    },
    Section {
        section: Section,
        project_id: u64,
        /// The full flat section list for the enclosing suite, shared
        /// by every section node under it. Child discovery and
        /// ancestor checks filter this list locally, with no further
        /// remote calls.
        siblings: Arc<Vec<Section>>,
    },
    /// Synthetic grouping for a suite's runs. Exists only when the
    /// suite has at least one run; never persisted remotely.
    RunsCategory {
        project_id: u64,
        suite_id: u64,
        run_count: usize,
    },
    Run(Run),
    Test {
        test: RunTest,
        /// The owning run, kept for display context in detail panels.
        run: Arc<Run>,
    },
    Case(TestCase),
}

impl Node {
    /// The `(kind, primary key)` identity of this node. The synthetic
    /// runs category borrows its suite's id; the kind keeps it from
    /// colliding with the suite itself.
    pub fn key(&self) -> NodeKey {
        match self {
            Node::Project(p) => NodeKey {
                kind: NodeKind::Project,
                id: p.id,
            },
            Node::Suite { suite, .. } => NodeKey {
                kind: NodeKind::Suite,
                id: suite.id,
            },
            Node::Section { section, .. } => NodeKey {
                kind: NodeKind::Section,
                id: section.id,
            },
            Node::RunsCategory { suite_id, .. } => NodeKey {
                kind: NodeKind::RunsCategory,
                id: *suite_id,
            },
            Node::Run(r) => NodeKey {
                kind: NodeKind::Run,
                id: r.id,
            },
            Node::Test { test, .. } => NodeKey {
                kind: NodeKind::Test,
                id: test.id,
            },
            Node::Case(c) => NodeKey {
                kind: NodeKind::Case,
                id: c.id,
            },
        }
    }

    /// Display label, also used to name the node in notices.
    pub fn label(&self) -> String {
        match self {
            Node::Project(p) => p.name.clone(),
            Node::Suite { suite, .. } => suite.name.clone(),
            Node::Section { section, .. } => section.name.clone(),
            Node::RunsCategory { run_count, .. } => format!("Runs ({})", run_count),
            Node::Run(r) => r.name.clone(),
            Node::Test { test, .. } => test.title.clone(),
            Node::Case(c) => c.title.clone(),
        }
    }

    /// Whether this node can be asked for children. Tests and cases
    /// are leaves; their results and fields are detail-panel content.
    pub fn can_expand(&self) -> bool {
        !matches!(self, Node::Test { .. } | Node::Case(_))
    }

    /// Whether this node accepts drag-and-drop payloads. Sections are
    /// the only valid drop target.
    pub fn is_drop_target(&self) -> bool {
        matches!(self, Node::Section { .. })
    }
}

/// Walk the `parent_id` chain of `node_id` upward through the flat
/// sibling list, looking for `candidate_ancestor_id`.
///
/// Terminates even on a corrupted listing: an already-visited id is a
/// dead end rather than a loop, and a `parent_id` that references no
/// section in the list stops the walk (the node is treated as
/// root-level). Never errors.
pub fn is_descendant_of(
    candidate_ancestor_id: u64,
    node_id: u64,
    sections: &[Section],
) -> bool {
    let mut visited = HashSet::new();
    let mut current = node_id;
    loop {
        if !visited.insert(current) {
            // Cyclic parent_id misconfiguration on the remote side.
            return false;
        }
        let parent = sections
            .iter()
            .find(|s| s.id == current)
            .and_then(|s| s.parent_id);
        match parent {
            Some(p) if p == candidate_ancestor_id => return true,
            Some(p) => current = p,
            None => return false,
        }
    }
}

/// Order runs by creation time descending, newest first. Ties break
/// by id descending so the order is deterministic.
pub fn sort_runs(runs: &mut [Run]) {
    runs.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.id.cmp(&a.id)));
}

/// Order sections by their explicit display-order field.
pub fn sort_sections(sections: &mut [Section]) {
    sections.sort_by(|a, b| a.display_order.cmp(&b.display_order).then(a.id.cmp(&b.id)));
}
