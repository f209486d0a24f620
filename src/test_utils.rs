/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Shared test fixtures: an in-memory [`RemoteService`], a notifier
//! that records notices, and a fake panel host. Unit tests assert on
//! the call log and the notices rather than on network traffic.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use crate::node::Node;
use crate::notify::Notifier;
use crate::panel::Panel;
use crate::panel::PanelHost;
use crate::panel::PanelMessage;
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

/// Captures notices so tests can assert on what the user saw.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub(crate) fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Debug, Default)]
struct State {
    projects: Vec<Project>,
    suites: Vec<Suite>,
    sections: Vec<Section>,
    runs: Vec<Run>,
    tests: Vec<RunTest>,
    cases: Vec<TestCase>,
    results: Vec<CaseResult>,
    statuses: Vec<Status>,
    milestones: Vec<Milestone>,
    next_id: u64,
}

/// In-memory stand-in for the remote service.
///
/// Records every call in order and can be told to fail specific
/// operations. Mutations actually apply, so a refreshed expansion
/// observes them the way it would against the real service.
#[derive(Debug, Default)]
pub(crate) struct InMemoryService {
    state: Mutex<State>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl InMemoryService {
    /// Every call made so far, in order. Listings record their name,
    /// mutations their name and arguments.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Force every future call to `op` to fail with HTTP 500.
    pub(crate) fn fail_op(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub(crate) fn clear_runs(&self) {
        self.state.lock().unwrap().runs.clear();
    }

    pub(crate) fn sections(&self) -> Vec<Section> {
        self.state.lock().unwrap().sections.clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn check(&self, op: &'static str) -> Result<(), RemoteError> {
        if self.failing.lock().unwrap().contains(op) {
            return Err(RemoteError::Status {
                op,
                status: 500,
                message: "forced failure".to_string(),
            });
        }
        Ok(())
    }

    fn fresh_id(state: &mut State) -> u64 {
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl RemoteService for InMemoryService {
    async fn list_projects(&self) -> Result<Vec<Project>, RemoteError> {
        self.record("list_projects");
        self.check("list_projects")?;
        Ok(self.state.lock().unwrap().projects.clone())
    }

    async fn list_suites(&self, project_id: u64) -> Result<Vec<Suite>, RemoteError> {
        self.record("list_suites");
        self.check("list_suites")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .suites
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_sections(
        &self,
        _project_id: u64,
        suite_id: u64,
    ) -> Result<Vec<Section>, RemoteError> {
        self.record("list_sections");
        self.check("list_sections")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .sections
            .iter()
            .filter(|s| s.suite_id == suite_id)
            .cloned()
            .collect())
    }

    async fn list_runs(&self, project_id: u64) -> Result<Vec<Run>, RemoteError> {
        self.record("list_runs");
        self.check("list_runs")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .runs
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_tests(&self, run_id: u64) -> Result<Vec<RunTest>, RemoteError> {
        self.record("list_tests");
        self.check("list_tests")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .tests
            .iter()
            .filter(|t| t.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn list_cases(
        &self,
        _project_id: u64,
        suite_id: u64,
        section_id: u64,
    ) -> Result<Vec<TestCase>, RemoteError> {
        self.record("list_cases");
        self.check("list_cases")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .cases
            .iter()
            .filter(|c| c.suite_id == suite_id && c.section_id == section_id)
            .cloned()
            .collect())
    }

    async fn list_results(&self, test_id: u64) -> Result<Vec<CaseResult>, RemoteError> {
        self.record("list_results");
        self.check("list_results")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .results
            .iter()
            .filter(|r| r.test_id == test_id)
            .cloned()
            .collect())
    }

    async fn list_statuses(&self) -> Result<Vec<Status>, RemoteError> {
        self.record("list_statuses");
        self.check("list_statuses")?;
        Ok(self.state.lock().unwrap().statuses.clone())
    }

    async fn list_milestones(&self, project_id: u64) -> Result<Vec<Milestone>, RemoteError> {
        self.record("list_milestones");
        self.check("list_milestones")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .milestones
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn add_suite(&self, project_id: u64, draft: &SuiteDraft) -> Result<Suite, RemoteError> {
        self.record(format!("add_suite({}, {:?})", project_id, draft.name));
        self.check("add_suite")?;
        let mut state = self.state.lock().unwrap();
        let suite = Suite {
            id: Self::fresh_id(&mut state),
            project_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
        };
        state.suites.push(suite.clone());
        Ok(suite)
    }

    async fn add_section(
        &self,
        project_id: u64,
        draft: &SectionDraft,
    ) -> Result<Section, RemoteError> {
        self.record(format!("add_section({}, {:?})", project_id, draft.name));
        self.check("add_section")?;
        let mut state = self.state.lock().unwrap();
        let display_order = state.sections.len() as i64 + 1;
        let section = Section {
            id: Self::fresh_id(&mut state),
            suite_id: draft.suite_id,
            parent_id: draft.parent_id,
            name: draft.name.clone(),
            display_order,
        };
        state.sections.push(section.clone());
        Ok(section)
    }

    async fn add_run(&self, project_id: u64, draft: &RunDraft) -> Result<Run, RemoteError> {
        self.record(format!("add_run({}, {:?})", project_id, draft.name));
        self.check("add_run")?;
        let mut state = self.state.lock().unwrap();
        let created_on = state.runs.iter().map(|r| r.created_on).max().unwrap_or(0) + 1;
        let run = Run {
            id: Self::fresh_id(&mut state),
            suite_id: draft.suite_id,
            project_id,
            name: draft.name.clone(),
            is_completed: false,
            created_on,
        };
        state.runs.push(run.clone());
        Ok(run)
    }

    async fn add_case(&self, section_id: u64, draft: &CaseDraft) -> Result<TestCase, RemoteError> {
        self.record(format!("add_case({}, {:?})", section_id, draft.title));
        self.check("add_case")?;
        let mut state = self.state.lock().unwrap();
        let suite_id = state
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .map(|s| s.suite_id)
            .unwrap_or_default();
        let case = TestCase {
            id: Self::fresh_id(&mut state),
            section_id,
            suite_id,
            title: draft.title.clone(),
            refs: draft.refs.clone(),
            priority_id: None,
        };
        state.cases.push(case.clone());
        Ok(case)
    }

    async fn add_milestone(
        &self,
        project_id: u64,
        draft: &MilestoneDraft,
    ) -> Result<Milestone, RemoteError> {
        self.record(format!("add_milestone({}, {:?})", project_id, draft.name));
        self.check("add_milestone")?;
        let mut state = self.state.lock().unwrap();
        let milestone = Milestone {
            id: Self::fresh_id(&mut state),
            project_id,
            name: draft.name.clone(),
            due_on: draft.due_on,
            is_completed: false,
        };
        state.milestones.push(milestone.clone());
        Ok(milestone)
    }

    async fn add_result(
        &self,
        test_id: u64,
        draft: &ResultDraft,
    ) -> Result<CaseResult, RemoteError> {
        self.record(format!("add_result({}, {})", test_id, draft.status_id));
        self.check("add_result")?;
        let mut state = self.state.lock().unwrap();
        let result = CaseResult {
            id: Self::fresh_id(&mut state),
            test_id,
            status_id: draft.status_id,
            comment: draft.comment.clone(),
            created_on: 0,
        };
        state.results.push(result.clone());
        Ok(result)
    }

    async fn update_run(&self, run_id: u64, update: &RunUpdate) -> Result<Run, RemoteError> {
        self.record(format!("update_run({})", run_id));
        self.check("update_run")?;
        let mut state = self.state.lock().unwrap();
        let run = state
            .runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or(RemoteError::Status {
                op: "update_run",
                status: 400,
                message: "run not found".to_string(),
            })?;
        if let Some(name) = &update.name {
            run.name = name.clone();
        }
        Ok(run.clone())
    }

    async fn update_case(
        &self,
        case_id: u64,
        update: &CaseUpdate,
    ) -> Result<TestCase, RemoteError> {
        self.record(format!("update_case({})", case_id));
        self.check("update_case")?;
        let mut state = self.state.lock().unwrap();
        let case = state
            .cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or(RemoteError::Status {
                op: "update_case",
                status: 400,
                message: "case not found".to_string(),
            })?;
        if let Some(title) = &update.title {
            case.title = title.clone();
        }
        if let Some(refs) = &update.refs {
            case.refs = Some(refs.clone());
        }
        if let Some(priority_id) = update.priority_id {
            case.priority_id = Some(priority_id);
        }
        Ok(case.clone())
    }

    async fn delete_suite(&self, suite_id: u64) -> Result<(), RemoteError> {
        self.record(format!("delete_suite({})", suite_id));
        self.check("delete_suite")?;
        self.state.lock().unwrap().suites.retain(|s| s.id != suite_id);
        Ok(())
    }

    async fn delete_section(&self, section_id: u64) -> Result<(), RemoteError> {
        self.record(format!("delete_section({})", section_id));
        self.check("delete_section")?;
        self.state
            .lock()
            .unwrap()
            .sections
            .retain(|s| s.id != section_id);
        Ok(())
    }

    async fn delete_run(&self, run_id: u64) -> Result<(), RemoteError> {
        self.record(format!("delete_run({})", run_id));
        self.check("delete_run")?;
        self.state.lock().unwrap().runs.retain(|r| r.id != run_id);
        Ok(())
    }

    async fn delete_case(&self, case_id: u64) -> Result<(), RemoteError> {
        self.record(format!("delete_case({})", case_id));
        self.check("delete_case")?;
        self.state.lock().unwrap().cases.retain(|c| c.id != case_id);
        Ok(())
    }

    async fn delete_milestone(&self, milestone_id: u64) -> Result<(), RemoteError> {
        self.record(format!("delete_milestone({})", milestone_id));
        self.check("delete_milestone")?;
        self.state
            .lock()
            .unwrap()
            .milestones
            .retain(|m| m.id != milestone_id);
        Ok(())
    }

    async fn move_cases_to_section(
        &self,
        case_ids: &[u64],
        section_id: u64,
        suite_id: u64,
    ) -> Result<(), RemoteError> {
        self.record(format!(
            "move_cases_to_section({:?}, {}, {})",
            case_ids, section_id, suite_id
        ));
        self.check("move_cases_to_section")?;
        let mut state = self.state.lock().unwrap();
        for case in state.cases.iter_mut().filter(|c| case_ids.contains(&c.id)) {
            case.section_id = section_id;
            case.suite_id = suite_id;
        }
        Ok(())
    }

    async fn move_section(
        &self,
        section_id: u64,
        parent_id: Option<u64>,
    ) -> Result<(), RemoteError> {
        self.record(format!("move_section({}, {:?})", section_id, parent_id));
        self.check("move_section")?;
        let mut state = self.state.lock().unwrap();
        if let Some(section) = state.sections.iter_mut().find(|s| s.id == section_id) {
            section.parent_id = parent_id;
        }
        Ok(())
    }

    async fn close_run(&self, run_id: u64) -> Result<Run, RemoteError> {
        self.record(format!("close_run({})", run_id));
        self.check("close_run")?;
        let mut state = self.state.lock().unwrap();
        let run = state
            .runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or(RemoteError::Status {
                op: "close_run",
                status: 400,
                message: "run not found".to_string(),
            })?;
        run.is_completed = true;
        Ok(run.clone())
    }
}

/// The standard fixture: project Alpha with suite Master, sections
/// A(10, root) / B(11, child of A) / C(12, root), three runs, one
/// test, and two cases. Project Beta (2) is empty.
pub(crate) fn fixture() -> InMemoryService {
    let service = InMemoryService::default();
    {
        let mut state = service.state.lock().unwrap();
        state.next_id = 1000;
        state.projects = vec![
            Project {
                id: 1,
                name: "Alpha".into(),
                announcement: None,
                is_completed: false,
            },
            Project {
                id: 2,
                name: "Beta".into(),
                announcement: None,
                is_completed: false,
            },
        ];
        state.suites = vec![Suite {
            id: 100,
            project_id: 1,
            name: "Master".into(),
            description: None,
        }];
        state.sections = vec![
            Section {
                id: 10,
                suite_id: 100,
                parent_id: None,
                name: "A".into(),
                display_order: 1,
            },
            Section {
                id: 11,
                suite_id: 100,
                parent_id: Some(10),
                name: "B".into(),
                display_order: 2,
            },
            Section {
                id: 12,
                suite_id: 100,
                parent_id: None,
                name: "C".into(),
                display_order: 3,
            },
        ];
        state.runs = vec![
            Run {
                id: 500,
                suite_id: 100,
                project_id: 1,
                name: "Nightly".into(),
                is_completed: false,
                created_on: 10,
            },
            Run {
                id: 501,
                suite_id: 100,
                project_id: 1,
                name: "Weekly".into(),
                is_completed: false,
                created_on: 20,
            },
            Run {
                id: 502,
                suite_id: 100,
                project_id: 1,
                name: "Release".into(),
                is_completed: false,
                created_on: 30,
            },
        ];
        state.tests = vec![RunTest {
            id: 700,
            case_id: 900,
            run_id: 500,
            title: "Login works".into(),
            status_id: 1,
        }];
        state.cases = vec![
            TestCase {
                id: 900,
                section_id: 10,
                suite_id: 100,
                title: "Login works".into(),
                refs: None,
                priority_id: None,
            },
            TestCase {
                id: 901,
                section_id: 12,
                suite_id: 100,
                title: "Checkout".into(),
                refs: None,
                priority_id: None,
            },
        ];
        state.statuses = vec![
            Status {
                id: 1,
                name: "passed".into(),
                label: "Passed".into(),
            },
            Status {
                id: 5,
                name: "failed".into(),
                label: "Failed".into(),
            },
        ];
        state.milestones = vec![Milestone {
            id: 300,
            project_id: 1,
            name: "v1.0".into(),
            due_on: None,
            is_completed: false,
        }];
    }
    service
}

/// A section node from the fixture suite, carrying the full sibling
/// list the way suite expansion would have built it.
pub(crate) fn section_node(id: u64) -> Node {
    let siblings = Arc::new(fixture().sections());
    let section = siblings
        .iter()
        .find(|s| s.id == id)
        .expect("fixture section")
        .clone();
    Node::Section {
        section,
        project_id: 1,
        siblings,
    }
}

#[derive(Debug, Default)]
struct PanelLogInner {
    created: Vec<String>,
    revealed: HashMap<String, usize>,
    posted: HashMap<String, Vec<PanelMessage>>,
    flags: HashMap<String, Arc<AtomicBool>>,
}

/// Shared journal of everything the fake panel host observed.
#[derive(Debug, Clone, Default)]
pub(crate) struct PanelLog {
    inner: Arc<Mutex<PanelLogInner>>,
}

impl PanelLog {
    pub(crate) fn created(&self) -> Vec<String> {
        self.inner.lock().unwrap().created.clone()
    }

    pub(crate) fn revealed(&self, key: &str) -> usize {
        *self
            .inner
            .lock()
            .unwrap()
            .revealed
            .get(key)
            .unwrap_or(&0)
    }

    pub(crate) fn posted(&self, key: &str) -> Vec<PanelMessage> {
        self.inner
            .lock()
            .unwrap()
            .posted
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Simulate the user closing the most recent panel for `key`.
    pub(crate) fn dispose(&self, key: &str) {
        if let Some(flag) = self.inner.lock().unwrap().flags.get(key) {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

pub(crate) struct FakePanel {
    key: String,
    log: PanelLog,
    disposed: Arc<AtomicBool>,
}

impl Panel for FakePanel {
    fn reveal(&mut self) {
        *self
            .log
            .inner
            .lock()
            .unwrap()
            .revealed
            .entry(self.key.clone())
            .or_insert(0) += 1;
    }

    fn post(&mut self, message: &PanelMessage) {
        self.log
            .inner
            .lock()
            .unwrap()
            .posted
            .entry(self.key.clone())
            .or_default()
            .push(message.clone());
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

/// Panel host whose panels only write to the shared [`PanelLog`].
pub(crate) struct FakeHost {
    log: PanelLog,
}

impl FakeHost {
    pub(crate) fn new(log: PanelLog) -> Self {
        Self { log }
    }
}

impl PanelHost for FakeHost {
    fn create_panel(&mut self, key: &str, _title: &str) -> Box<dyn Panel> {
        let disposed = Arc::new(AtomicBool::new(false));
        let mut inner = self.log.inner.lock().unwrap();
        inner.created.push(key.to_string());
        inner.flags.insert(key.to_string(), Arc::clone(&disposed));
        drop(inner);
        Box::new(FakePanel {
            key: key.to_string(),
            log: self.log.clone(),
            disposed,
        })
    }
}
