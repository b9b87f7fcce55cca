//! Global flags and per-run goal context

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use chartgoal_core::Project;
use chartgoal_helm::{
    GoalEvent, GoalInvocation, HelmConfiguration, HelmConfigurationLayer, InMemoryVersionTracker,
    RepoRef, TokioCommandRunner,
};

use crate::error::Result;
use crate::settings::{self, GoalFile};

/// Flags accepted by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project directory
    #[arg(long, global = true, default_value = ".", env = "CHARTGOAL_PROJECT")]
    pub project: PathBuf,

    /// Goal file with `helm`, `package` and `deploy` sections
    #[arg(long, global = true, env = "CHARTGOAL_GOALS")]
    pub goals: Option<PathBuf>,

    /// Helm executable
    #[arg(long, global = true, env = "CHARTGOAL_HELM_CMD")]
    pub helm_cmd: Option<String>,

    /// Kubernetes context for install, upgrade and list
    #[arg(long, global = true, env = "CHARTGOAL_KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    /// Log full helm command lines (may expose credentials)
    #[arg(long, global = true, env = "CHARTGOAL_LOG_COMMAND")]
    pub log_command: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Repository owner of the commit
    #[arg(long, global = true, default_value = "", env = "CHARTGOAL_OWNER")]
    pub owner: String,

    /// Repository name of the commit
    #[arg(long, global = true, default_value = "", env = "CHARTGOAL_REPO")]
    pub repo: String,

    /// SCM provider id
    #[arg(long, global = true, default_value = "", env = "CHARTGOAL_PROVIDER_ID")]
    pub provider_id: String,

    /// Commit sha
    #[arg(long, global = true, default_value = "", env = "CHARTGOAL_SHA")]
    pub sha: String,

    /// Branch of the commit
    #[arg(long, global = true, default_value = "", env = "CHARTGOAL_BRANCH")]
    pub branch: String,

    /// Version tracked for this commit by an earlier version goal
    #[arg(long, global = true, env = "CHARTGOAL_TRACKED_VERSION")]
    pub tracked_version: Option<String>,
}

impl GlobalArgs {
    pub fn project(&self) -> Project {
        Project::new(&self.project)
    }

    pub fn event(&self) -> GoalEvent {
        GoalEvent {
            repo: RepoRef::new(&self.owner, &self.repo, &self.provider_id),
            sha: self.sha.clone(),
            branch: self.branch.clone(),
        }
    }

    /// Configuration layer set on the command line or through the environment
    fn flag_layer(&self) -> HelmConfigurationLayer {
        HelmConfigurationLayer {
            cmd: self.helm_cmd.clone(),
            context: self.kube_context.clone(),
            global_options: Vec::new(),
            log_command: self.log_command.then_some(true),
        }
    }
}

/// Everything a goal subcommand needs
pub struct GoalContext {
    pub goals: GoalFile,
    pub config: HelmConfiguration,
    pub invocation: GoalInvocation,
}

impl GoalContext {
    /// Load configuration layers and build the invocation for this run
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let goals = GoalFile::load(args.goals.as_deref())?;
        let user = settings::load_user_layer(settings::user_config_path().as_deref())?;
        let config = settings::helm_configuration(user, goals.helm.clone(), args.flag_layer());

        let event = args.event();
        let tracker = InMemoryVersionTracker::new();
        if let Some(version) = &args.tracked_version {
            tracker.record(&event, version);
        }

        let invocation = GoalInvocation::new(
            args.project(),
            event,
            Arc::new(TokioCommandRunner::new()),
        )
        .with_tracker(Arc::new(tracker));

        tracing::debug!(cmd = %config.cmd, context = ?config.context, "helm configuration");
        Ok(Self {
            goals,
            config,
            invocation,
        })
    }
}
