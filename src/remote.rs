/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The remote data service contract.
//!
//! Every operation is asynchronous and may fail; failures carry a
//! human-readable message. The crate ships one concrete
//! implementation ([`crate::client::HttpService`]) and the tests use
//! an in-memory one. Listings are flat: there is no server-side tree
//! endpoint, so section/run hierarchy is derived locally by filtering.

use async_trait::async_trait;

use crate::record::CaseDraft;
use crate::record::CaseResult;
use crate::record::CaseUpdate;
use crate::record::Milestone;
use crate::record::MilestoneDraft;
use crate::record::Project;
use crate::record::ResultDraft;
use crate::record::Run;
use crate::record::RunDraft;
use crate::record::RunTest;
use crate::record::RunUpdate;
use crate::record::Section;
use crate::record::SectionDraft;
use crate::record::Status;
use crate::record::Suite;
use crate::record::SuiteDraft;
use crate::record::TestCase;

/// Failure of a remote operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    /// The service answered with a non-success status.
    #[error("{op}: HTTP {status}: {message}")]
    Status {
        op: &'static str,
        status: u16,
        message: String,
    },
    /// The request never completed (connect, timeout, ...).
    #[error("{op}: request failed: {message}")]
    Transport { op: &'static str, message: String },
    /// The response body could not be decoded.
    #[error("{op}: malformed response: {message}")]
    Decode { op: &'static str, message: String },
}

/// Asynchronous CRUD + listing contract over the remote
/// test-management service.
#[async_trait]
pub trait RemoteService: Send + Sync {
    // Listings.
    async fn list_projects(&self) -> Result<Vec<Project>, RemoteError>;
    async fn list_suites(&self, project_id: u64) -> Result<Vec<Suite>, RemoteError>;
    /// The full flat section list for a suite, all depths.
    async fn list_sections(&self, project_id: u64, suite_id: u64)
    -> Result<Vec<Section>, RemoteError>;
    /// All runs for a project, across suites.
    async fn list_runs(&self, project_id: u64) -> Result<Vec<Run>, RemoteError>;
    async fn list_tests(&self, run_id: u64) -> Result<Vec<RunTest>, RemoteError>;
    async fn list_cases(
        &self,
        project_id: u64,
        suite_id: u64,
        section_id: u64,
    ) -> Result<Vec<TestCase>, RemoteError>;
    async fn list_results(&self, test_id: u64) -> Result<Vec<CaseResult>, RemoteError>;
    async fn list_statuses(&self) -> Result<Vec<Status>, RemoteError>;
    async fn list_milestones(&self, project_id: u64) -> Result<Vec<Milestone>, RemoteError>;

    // Creation.
    async fn add_suite(&self, project_id: u64, draft: &SuiteDraft) -> Result<Suite, RemoteError>;
    async fn add_section(
        &self,
        project_id: u64,
        draft: &SectionDraft,
    ) -> Result<Section, RemoteError>;
    async fn add_run(&self, project_id: u64, draft: &RunDraft) -> Result<Run, RemoteError>;
    async fn add_case(&self, section_id: u64, draft: &CaseDraft) -> Result<TestCase, RemoteError>;
    async fn add_milestone(
        &self,
        project_id: u64,
        draft: &MilestoneDraft,
    ) -> Result<Milestone, RemoteError>;
    async fn add_result(&self, test_id: u64, draft: &ResultDraft)
    -> Result<CaseResult, RemoteError>;

    // In-place updates.
    async fn update_run(&self, run_id: u64, update: &RunUpdate) -> Result<Run, RemoteError>;
    async fn update_case(&self, case_id: u64, update: &CaseUpdate)
    -> Result<TestCase, RemoteError>;

    // Deletion.
    async fn delete_suite(&self, suite_id: u64) -> Result<(), RemoteError>;
    async fn delete_section(&self, section_id: u64) -> Result<(), RemoteError>;
    async fn delete_run(&self, run_id: u64) -> Result<(), RemoteError>;
    async fn delete_case(&self, case_id: u64) -> Result<(), RemoteError>;
    async fn delete_milestone(&self, milestone_id: u64) -> Result<(), RemoteError>;

    // Structural moves.
    /// Move test cases into a target section (and its suite).
    async fn move_cases_to_section(
        &self,
        case_ids: &[u64],
        section_id: u64,
        suite_id: u64,
    ) -> Result<(), RemoteError>;
    /// Re-parent a section within its suite. `parent_id = None` makes
    /// it a root section. Cross-suite moves are not part of the
    /// contract: the suite is implicitly unchanged.
    async fn move_section(&self, section_id: u64, parent_id: Option<u64>)
    -> Result<(), RemoteError>;

    /// Close a run. Closing an already-completed run is a remote-side
    /// error; callers guard before reaching here.
    async fn close_run(&self, run_id: u64) -> Result<Run, RemoteError>;
}
