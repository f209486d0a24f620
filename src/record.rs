/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Read-only projections of the remote service's records.
//!
//! Field names follow the remote wire format (snake_case), so the
//! serde derives need no renames. Records are plain data: all tree
//! context (owning project, sibling lists) lives on [`crate::Node`],
//! not here.

use serde::Deserialize;
use serde::Serialize;

/// A project, the top level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub announcement: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// A test suite within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A section within a suite.
///
/// Sections form a tree through `parent_id`, but the remote service
/// only exposes a flat listing; the hierarchy is re-derived locally
/// by filtering on `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    pub suite_id: u64,
    #[serde(default)]
    pub parent_id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub display_order: i64,
}

/// A test run within a suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: u64,
    pub suite_id: u64,
    pub project_id: u64,
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Creation time, seconds since the UNIX epoch.
    #[serde(default)]
    pub created_on: i64,
}

/// A test instance inside a run (one per selected case).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTest {
    pub id: u64,
    pub case_id: u64,
    pub run_id: u64,
    pub title: String,
    pub status_id: u64,
}

/// A test case within a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: u64,
    pub section_id: u64,
    pub suite_id: u64,
    pub title: String,
    #[serde(default)]
    pub refs: Option<String>,
    #[serde(default)]
    pub priority_id: Option<u64>,
}

/// A result recorded against a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub id: u64,
    pub test_id: u64,
    pub status_id: u64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_on: i64,
}

/// A result status (passed, failed, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub name: String,
    pub label: String,
}

/// A milestone within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    #[serde(default)]
    pub due_on: Option<i64>,
    #[serde(default)]
    pub is_completed: bool,
}

// Drafts: the canonical internal representation produced once at the
// command boundary. Hosts prompt for fields however they like; the
// core only ever sees these.

/// Fields for creating a suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuiteDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields for creating a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionDraft {
    pub name: String,
    pub suite_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

/// Fields for creating a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunDraft {
    pub name: String,
    pub suite_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields for creating a test case.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseDraft {
    pub title: String,
    pub section_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
}

/// Fields for creating a milestone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MilestoneDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<i64>,
}

/// Fields for recording a result against a test.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultDraft {
    pub status_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Fields for updating a run in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields for updating a test case in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
}
