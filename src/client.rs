/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! `reqwest`-backed implementation of [`RemoteService`].
//!
//! The remote API is path-in-query style: every operation lives under
//! `{base}/index.php?/api/v2/{op}`, reads are GETs, and all mutations
//! are POSTs with a JSON body (deletes post an empty one).
//! Authentication is HTTP basic with the account name and API key
//! from [`Settings`]; establishing those credentials is the host's
//! business.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Settings;
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
use crate::remote::RemoteError;
use crate::remote::RemoteService;

/// HTTP client for one remote instance.
pub struct HttpService {
    base_url: String,
    auth: String,
    client: reqwest::Client,
}

impl HttpService {
    pub fn new(settings: &Settings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        let credentials = format!("{}:{}", settings.username, settings.api_key);
        Self {
            base_url: settings.base_url_trimmed().to_string(),
            auth: format!("Basic {}", BASE64.encode(credentials)),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/index.php?/api/v2/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        op: &'static str,
        path: &str,
    ) -> Result<T, RemoteError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header(AUTHORIZATION, &self.auth)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                op,
                message: e.to_string(),
            })?;
        Self::decode(op, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        op: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header(AUTHORIZATION, &self.auth)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                op,
                message: e.to_string(),
            })?;
        Self::decode(op, response).await
    }

    /// POST whose response body carries nothing of interest
    /// (deletes, moves). Only the status is checked.
    async fn post_unit<B: Serialize + ?Sized>(
        &self,
        op: &'static str,
        path: &str,
        body: &B,
    ) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header(AUTHORIZATION, &self.auth)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                op,
                message: e.to_string(),
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status {
                op,
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn decode<T: DeserializeOwned>(
        op: &'static str,
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                op,
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        response.json::<T>().await.map_err(|e| RemoteError::Decode {
            op,
            message: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl RemoteService for HttpService {
    async fn list_projects(&self) -> Result<Vec<Project>, RemoteError> {
        self.get("get_projects", "get_projects").await
    }

    async fn list_suites(&self, project_id: u64) -> Result<Vec<Suite>, RemoteError> {
        self.get("get_suites", &format!("get_suites/{}", project_id))
            .await
    }

    async fn list_sections(
        &self,
        project_id: u64,
        suite_id: u64,
    ) -> Result<Vec<Section>, RemoteError> {
        self.get(
            "get_sections",
            &format!("get_sections/{}&suite_id={}", project_id, suite_id),
        )
        .await
    }

    async fn list_runs(&self, project_id: u64) -> Result<Vec<Run>, RemoteError> {
        self.get("get_runs", &format!("get_runs/{}", project_id))
            .await
    }

    async fn list_tests(&self, run_id: u64) -> Result<Vec<RunTest>, RemoteError> {
        self.get("get_tests", &format!("get_tests/{}", run_id)).await
    }

    async fn list_cases(
        &self,
        project_id: u64,
        suite_id: u64,
        section_id: u64,
    ) -> Result<Vec<TestCase>, RemoteError> {
        self.get(
            "get_cases",
            &format!(
                "get_cases/{}&suite_id={}&section_id={}",
                project_id, suite_id, section_id
            ),
        )
        .await
    }

    async fn list_results(&self, test_id: u64) -> Result<Vec<CaseResult>, RemoteError> {
        self.get("get_results", &format!("get_results/{}", test_id))
            .await
    }

    async fn list_statuses(&self) -> Result<Vec<Status>, RemoteError> {
        self.get("get_statuses", "get_statuses").await
    }

    async fn list_milestones(&self, project_id: u64) -> Result<Vec<Milestone>, RemoteError> {
        self.get("get_milestones", &format!("get_milestones/{}", project_id))
            .await
    }

    async fn add_suite(&self, project_id: u64, draft: &SuiteDraft) -> Result<Suite, RemoteError> {
        self.post("add_suite", &format!("add_suite/{}", project_id), draft)
            .await
    }

    async fn add_section(
        &self,
        project_id: u64,
        draft: &SectionDraft,
    ) -> Result<Section, RemoteError> {
        self.post("add_section", &format!("add_section/{}", project_id), draft)
            .await
    }

    async fn add_run(&self, project_id: u64, draft: &RunDraft) -> Result<Run, RemoteError> {
        self.post("add_run", &format!("add_run/{}", project_id), draft)
            .await
    }

    async fn add_case(&self, section_id: u64, draft: &CaseDraft) -> Result<TestCase, RemoteError> {
        self.post("add_case", &format!("add_case/{}", section_id), draft)
            .await
    }

    async fn add_milestone(
        &self,
        project_id: u64,
        draft: &MilestoneDraft,
    ) -> Result<Milestone, RemoteError> {
        self.post(
            "add_milestone",
            &format!("add_milestone/{}", project_id),
            draft,
        )
        .await
    }

    async fn add_result(
        &self,
        test_id: u64,
        draft: &ResultDraft,
    ) -> Result<CaseResult, RemoteError> {
        self.post("add_result", &format!("add_result/{}", test_id), draft)
            .await
    }

    async fn update_run(&self, run_id: u64, update: &RunUpdate) -> Result<Run, RemoteError> {
        self.post("update_run", &format!("update_run/{}", run_id), update)
            .await
    }

    async fn update_case(
        &self,
        case_id: u64,
        update: &CaseUpdate,
    ) -> Result<TestCase, RemoteError> {
        self.post("update_case", &format!("update_case/{}", case_id), update)
            .await
    }

    async fn delete_suite(&self, suite_id: u64) -> Result<(), RemoteError> {
        self.post_unit(
            "delete_suite",
            &format!("delete_suite/{}", suite_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn delete_section(&self, section_id: u64) -> Result<(), RemoteError> {
        self.post_unit(
            "delete_section",
            &format!("delete_section/{}", section_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn delete_run(&self, run_id: u64) -> Result<(), RemoteError> {
        self.post_unit(
            "delete_run",
            &format!("delete_run/{}", run_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn delete_case(&self, case_id: u64) -> Result<(), RemoteError> {
        self.post_unit(
            "delete_case",
            &format!("delete_case/{}", case_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn delete_milestone(&self, milestone_id: u64) -> Result<(), RemoteError> {
        self.post_unit(
            "delete_milestone",
            &format!("delete_milestone/{}", milestone_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn move_cases_to_section(
        &self,
        case_ids: &[u64],
        section_id: u64,
        suite_id: u64,
    ) -> Result<(), RemoteError> {
        self.post_unit(
            "move_cases_to_section",
            &format!("move_cases_to_section/{}", section_id),
            &serde_json::json!({ "case_ids": case_ids, "suite_id": suite_id }),
        )
        .await
    }

    async fn move_section(
        &self,
        section_id: u64,
        parent_id: Option<u64>,
    ) -> Result<(), RemoteError> {
        self.post_unit(
            "move_section",
            &format!("move_section/{}", section_id),
            &serde_json::json!({ "parent_id": parent_id }),
        )
        .await
    }

    async fn close_run(&self, run_id: u64) -> Result<Run, RemoteError> {
        self.post(
            "close_run",
            &format!("close_run/{}", run_id),
            &serde_json::json!({}),
        )
        .await
    }
}
