/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The lazy expansion engine: per-kind derivation of a node's
//! immediate children.
//!
//! Children are fetched only when a subtree is expanded; there is no
//! eager whole-hierarchy preload and no caching across expansions.
//! Within one expansion the output order is deterministic (root
//! sections before the runs category, runs newest-first) regardless
//! of remote response arrival order.
//!
//! Failure never crosses the expansion boundary: a fetch error is
//! surfaced as an error notice naming the failing node and resolves
//! to an empty child list, so one broken branch cannot abort sibling
//! expansions or the host's render. Empty-but-valid results emit an
//! informational notice and are likewise an empty list.

use std::sync::Arc;

use crate::node::Node;
use crate::node::sort_runs;
use crate::node::sort_sections;
use crate::notify::Notifier;
use crate::record::Project;
use crate::record::Run;
use crate::record::Section;
use crate::record::Suite;
use crate::remote::RemoteError;
use crate::remote::RemoteService;

/// Produces the ordered child list for any node on demand.
pub struct Explorer {
    service: Arc<dyn RemoteService>,
    notices: Arc<dyn Notifier>,
    /// When set, the virtual root shows only this project.
    project_filter: Option<u64>,
}

impl Explorer {
    pub fn new(
        service: Arc<dyn RemoteService>,
        notices: Arc<dyn Notifier>,
        project_filter: Option<u64>,
    ) -> Self {
        Self {
            service,
            notices,
            project_filter,
        }
    }

    /// Immediate children of `parent`; `None` is the virtual root.
    ///
    /// This is the expansion boundary: remote failures are converted
    /// to notices here and never propagate.
    pub async fn children(&self, parent: Option<&Node>) -> Vec<Node> {
        let result = match parent {
            None => self.root_children().await,
            Some(Node::Project(project)) => self.project_children(project).await,
            Some(Node::Suite { suite, project_id }) => {
                self.suite_children(suite, *project_id).await
            }
            Some(Node::RunsCategory {
                project_id,
                suite_id,
                ..
            }) => self.category_children(*project_id, *suite_id).await,
            Some(Node::Run(run)) => self.run_children(run).await,
            Some(Node::Section {
                section,
                project_id,
                siblings,
            }) => self.section_children(section, *project_id, siblings).await,
            // Leaves: no remote call, no notice.
            Some(Node::Test { .. }) | Some(Node::Case(_)) => Ok(Vec::new()),
        };

        match result {
            Ok(children) => children,
            Err(err) => {
                let name = parent
                    .map(|node| node.label())
                    .unwrap_or_else(|| "projects".to_string());
                tracing::warn!(node = %name, error = %err, "expansion failed");
                self.notices
                    .error(&format!("Failed to load children of {}: {}", name, err));
                Vec::new()
            }
        }
    }

    async fn root_children(&self) -> Result<Vec<Node>, RemoteError> {
        let mut projects = self.service.list_projects().await?;
        if let Some(filter) = self.project_filter {
            projects.retain(|p| p.id == filter);
            if projects.is_empty() {
                self.notices.info(&format!(
                    "No project matches the configured project id {}",
                    filter
                ));
                return Ok(Vec::new());
            }
        } else if projects.is_empty() {
            self.notices.info("No projects found");
            return Ok(Vec::new());
        }
        Ok(projects.into_iter().map(Node::Project).collect())
    }

    async fn project_children(&self, project: &Project) -> Result<Vec<Node>, RemoteError> {
        let suites = self.service.list_suites(project.id).await?;
        if suites.is_empty() {
            self.notices
                .info(&format!("Project {} has no suites", project.name));
            return Ok(Vec::new());
        }
        let project_id = project.id;
        Ok(suites
            .into_iter()
            .map(|suite| Node::Suite { suite, project_id })
            .collect())
    }

    /// Children of a suite: its root sections followed by the runs
    /// category, which exists iff the suite has at least one run.
    ///
    /// Sections and runs have no ordering dependency, so both
    /// listings are fetched concurrently.
    async fn suite_children(&self, suite: &Suite, project_id: u64) -> Result<Vec<Node>, RemoteError> {
        let (sections, runs) = tokio::join!(
            self.service.list_sections(project_id, suite.id),
            self.service.list_runs(project_id),
        );
        let sections = sections?;
        let run_count = runs?.iter().filter(|r| r.suite_id == suite.id).count();

        let siblings = Arc::new(sections);
        let mut roots: Vec<Section> = siblings
            .iter()
            .filter(|s| s.parent_id.is_none())
            .cloned()
            .collect();
        sort_sections(&mut roots);

        let mut children: Vec<Node> = roots
            .into_iter()
            .map(|section| Node::Section {
                section,
                project_id,
                siblings: Arc::clone(&siblings),
            })
            .collect();
        if run_count > 0 {
            children.push(Node::RunsCategory {
                project_id,
                suite_id: suite.id,
                run_count,
            });
        }
        if children.is_empty() {
            self.notices
                .info(&format!("Suite {} has no sections or runs", suite.name));
        }
        Ok(children)
    }

    async fn category_children(
        &self,
        project_id: u64,
        suite_id: u64,
    ) -> Result<Vec<Node>, RemoteError> {
        let mut runs: Vec<Run> = self
            .service
            .list_runs(project_id)
            .await?
            .into_iter()
            .filter(|r| r.suite_id == suite_id)
            .collect();
        if runs.is_empty() {
            // The category was synthesized from an earlier listing;
            // the runs may have been deleted since.
            self.notices
                .info(&format!("No runs found for suite {}", suite_id));
            return Ok(Vec::new());
        }
        sort_runs(&mut runs);
        Ok(runs.into_iter().map(Node::Run).collect())
    }

    async fn run_children(&self, run: &Run) -> Result<Vec<Node>, RemoteError> {
        let tests = self.service.list_tests(run.id).await?;
        if tests.is_empty() {
            self.notices
                .info(&format!("Run {} has no tests", run.name));
            return Ok(Vec::new());
        }
        let run = Arc::new(run.clone());
        Ok(tests
            .into_iter()
            .map(|test| Node::Test {
                test,
                run: Arc::clone(&run),
            })
            .collect())
    }

    /// Children of a section: child sections discovered by filtering
    /// the already-fetched flat sibling list (no remote call),
    /// followed by the test cases listed for this section and suite.
    async fn section_children(
        &self,
        section: &Section,
        project_id: u64,
        siblings: &Arc<Vec<Section>>,
    ) -> Result<Vec<Node>, RemoteError> {
        let mut subsections: Vec<Section> = siblings
            .iter()
            .filter(|s| s.parent_id == Some(section.id))
            .cloned()
            .collect();
        sort_sections(&mut subsections);

        let cases = self
            .service
            .list_cases(project_id, section.suite_id, section.id)
            .await?;

        let mut children: Vec<Node> = subsections
            .into_iter()
            .map(|child| Node::Section {
                section: child,
                project_id,
                siblings: Arc::clone(siblings),
            })
            .collect();
        children.extend(cases.into_iter().map(Node::Case));
        if children.is_empty() {
            self.notices
                .info(&format!("Section {} is empty", section.name));
        }
        Ok(children)
    }
}
