//! Externally tracked versions
//!
//! A version goal earlier in the pipeline records the version it computed
//! for a commit; later goals look it up by commit identity.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::Result;
use crate::invocation::GoalEvent;

/// Read-only lookup of the version recorded for a commit
#[async_trait]
pub trait VersionTracker: Send + Sync {
    /// Version recorded for the event's (owner, repo, provider, sha, branch)
    async fn lookup_version(&self, event: &GoalEvent) -> Result<Option<String>>;
}

/// Identity of a tracked commit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CommitKey {
    owner: String,
    repo: String,
    provider_id: String,
    sha: String,
    branch: String,
}

impl From<&GoalEvent> for CommitKey {
    fn from(event: &GoalEvent) -> Self {
        Self {
            owner: event.repo.owner.clone(),
            repo: event.repo.name.clone(),
            provider_id: event.repo.provider_id.clone(),
            sha: event.sha.clone(),
            branch: event.branch.clone(),
        }
    }
}

/// Version tracker backed by an in-process map
#[derive(Debug, Clone, Default)]
pub struct InMemoryVersionTracker {
    versions: Arc<RwLock<HashMap<CommitKey, String>>>,
}

impl InMemoryVersionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version for the event's commit
    pub fn record(&self, event: &GoalEvent, version: impl Into<String>) {
        if let Ok(mut versions) = self.versions.write() {
            versions.insert(CommitKey::from(event), version.into());
        }
    }
}

#[async_trait]
impl VersionTracker for InMemoryVersionTracker {
    async fn lookup_version(&self, event: &GoalEvent) -> Result<Option<String>> {
        let versions = self
            .versions
            .read()
            .map_err(|e| crate::GoalError::VersionLookup(e.to_string()))?;
        Ok(versions.get(&CommitKey::from(event)).cloned())
    }
}
