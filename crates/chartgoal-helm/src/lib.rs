//! chartgoal Helm - goal executors driving the helm CLI
//!
//! This crate runs the Helm goals of a delivery pipeline:
//! - `execute_install`: refresh repositories, resolve install vs upgrade, run helm
//! - `execute_package`: assemble a chart build directory, package, upload
//! - `apply_tracked_version`: stamp the commit's tracked version into `Chart.yaml`
//! - `GoalTable`: named fulfillments executed per invocation
//!
//! All subprocess work goes through the `CommandRunner` trait; tests use
//! `MockCommandRunner`.

pub mod config;
pub mod error;
pub mod goal;
pub mod install;
pub mod invocation;
pub mod listener;
pub mod mock;
pub mod operation;
pub mod package;
pub mod process;
pub mod push;
pub mod registration;
pub mod tracker;
pub mod version;

pub use config::{DEFAULT_HELM_CMD, HelmConfiguration, HelmConfigurationLayer};
pub use error::{GoalError, GoalOutcome, Result};
pub use goal::{
    Executor, Fulfillment, GoalDefinition, GoalTable, HELM_DEPLOY, HELM_PACKAGE,
    deploy_fulfillment, package_fulfillment,
};
pub use install::{build_install_command, execute_install, prepare_install};
pub use invocation::{GoalEvent, GoalInvocation, RepoRef};
pub use listener::apply_tracked_version;
pub use mock::{MockCommandRunner, RecordedCommand};
pub use operation::{parse_release_list, resolve_operation};
pub use package::{archive_path, build_package_command, execute_package};
pub use process::{CommandRunner, ProcessOutput, SpawnOptions, TokioCommandRunner};
pub use push::{auth_header, upload_chart};
pub use registration::{
    Creator, InstallRegistration, PackageRegistration, PackageVersion, Provided, PushRequestOptions,
    PushTarget,
};
pub use tracker::{InMemoryVersionTracker, VersionTracker};
pub use version::{resolve_chart_version, resolve_package_version};
