//! Goal invocation context

use std::sync::Arc;

use chartgoal_core::Project;

use crate::process::CommandRunner;
use crate::tracker::{InMemoryVersionTracker, VersionTracker};

/// Repository a goal runs for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub provider_id: String,
}

impl RepoRef {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        provider_id: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            provider_id: provider_id.into(),
        }
    }
}

/// The commit a goal runs for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalEvent {
    pub repo: RepoRef,
    pub sha: String,
    pub branch: String,
}

/// Everything a single goal invocation works with
///
/// Built fresh for each invocation; nothing is shared between invocations
/// except the runner and tracker handles.
#[derive(Clone)]
pub struct GoalInvocation {
    pub project: Project,
    pub event: GoalEvent,
    runner: Arc<dyn CommandRunner>,
    tracker: Arc<dyn VersionTracker>,
}

impl GoalInvocation {
    /// Create an invocation with no tracked versions
    pub fn new(project: Project, event: GoalEvent, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            project,
            event,
            runner,
            tracker: Arc::new(InMemoryVersionTracker::new()),
        }
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn VersionTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn tracker(&self) -> &dyn VersionTracker {
        self.tracker.as_ref()
    }
}

impl std::fmt::Debug for GoalInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalInvocation")
            .field("project", &self.project)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
