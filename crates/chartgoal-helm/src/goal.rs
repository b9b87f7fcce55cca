//! Goal definitions and the fulfillment table
//!
//! A pipeline registers fulfillments by goal name and later executes them
//! per invocation. Every invocation gets a fresh [`GoalInvocation`]; the
//! registration and configuration are shared read-only.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;

use crate::config::HelmConfiguration;
use crate::error::GoalOutcome;
use crate::install::execute_install;
use crate::invocation::GoalInvocation;
use crate::package::execute_package;
use crate::registration::{InstallRegistration, PackageRegistration};

/// Static description of a goal as shown by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalDefinition {
    pub unique_name: &'static str,
    pub display_name: &'static str,
    pub working_description: &'static str,
    pub completed_description: &'static str,
    pub failed_description: &'static str,
    pub retry_feasible: bool,
}

/// Install or upgrade a release
pub const HELM_DEPLOY: GoalDefinition = GoalDefinition {
    unique_name: "helm-deploy",
    display_name: "Running: Helm",
    working_description: "Working: Helm Deploy",
    completed_description: "Completed: Helm Deploy",
    failed_description: "Failed: Helm Deploy",
    retry_feasible: true,
};

/// Package and optionally upload a chart
pub const HELM_PACKAGE: GoalDefinition = GoalDefinition {
    unique_name: "helm-package",
    display_name: "Running: Helm Package",
    working_description: "Working: Helm Package",
    completed_description: "Completed: Helm Package",
    failed_description: "Failed: Helm Package",
    retry_feasible: true,
};

/// Async goal body
pub type Executor = Arc<dyn Fn(GoalInvocation) -> BoxFuture<'static, GoalOutcome> + Send + Sync>;

/// A named executor registered with the goal table
#[derive(Clone)]
pub struct Fulfillment {
    pub name: String,
    pub executor: Executor,
}

impl Fulfillment {
    pub fn new<F>(name: impl Into<String>, executor: F) -> Self
    where
        F: Fn(GoalInvocation) -> BoxFuture<'static, GoalOutcome> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            executor: Arc::new(executor),
        }
    }
}

impl fmt::Debug for Fulfillment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fulfillment")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Fulfillment running the install/upgrade goal
pub fn deploy_fulfillment(
    registration: InstallRegistration,
    config: HelmConfiguration,
) -> Fulfillment {
    let registration = Arc::new(registration);
    let config = Arc::new(config);
    Fulfillment::new(HELM_DEPLOY.unique_name, move |invocation| {
        let registration = Arc::clone(&registration);
        let config = Arc::clone(&config);
        async move { GoalOutcome::from(execute_install(&registration, &config, &invocation).await) }
        .boxed()
    })
}

/// Fulfillment running the package goal
pub fn package_fulfillment(
    registration: PackageRegistration,
    config: HelmConfiguration,
) -> Fulfillment {
    let registration = Arc::new(registration);
    let config = Arc::new(config);
    Fulfillment::new(HELM_PACKAGE.unique_name, move |invocation| {
        let registration = Arc::clone(&registration);
        let config = Arc::clone(&config);
        async move { GoalOutcome::from(execute_package(&registration, &config, &invocation).await) }
        .boxed()
    })
}

/// Fulfillments by goal name
#[derive(Debug, Clone, Default)]
pub struct GoalTable {
    fulfillments: IndexMap<String, Fulfillment>,
}

impl GoalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fulfillment, replacing any previous one with the same name
    pub fn register(&mut self, fulfillment: Fulfillment) -> &mut Self {
        self.fulfillments.insert(fulfillment.name.clone(), fulfillment);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Fulfillment> {
        self.fulfillments.get(name)
    }

    /// Registered goal names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fulfillments.keys().map(String::as_str)
    }

    /// Run the named goal for one invocation
    pub async fn execute(&self, name: &str, invocation: GoalInvocation) -> GoalOutcome {
        match self.fulfillments.get(name) {
            Some(fulfillment) => {
                tracing::debug!(goal = name, "executing goal");
                (fulfillment.executor)(invocation).await
            }
            None => {
                let message = format!(
                    "invalid goal configuration: no fulfillment registered for goal '{}'",
                    name
                );
                tracing::error!("{}", message);
                GoalOutcome::Failure {
                    code: crate::error::GENERIC_FAILURE_CODE,
                    message,
                }
            }
        }
    }
}
