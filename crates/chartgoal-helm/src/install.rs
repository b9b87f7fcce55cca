//! Helm install/upgrade goal

use chartgoal_core::{ChartDetail, Operation, ReleaseDetail, synthesize_args};

use crate::config::HelmConfiguration;
use crate::error::{GoalError, Result};
use crate::invocation::GoalInvocation;
use crate::operation::resolve_operation;
use crate::process::SpawnOptions;
use crate::registration::InstallRegistration;
use crate::version::resolve_chart_version;

/// Build the argument list for `helm install` or `helm upgrade`
///
/// `args` are the synthesized options; `context_args` carry `--kube-context`.
/// `installOrUpgrade` must be resolved before calling this.
pub fn build_install_command(
    operation: Operation,
    chart: &ChartDetail,
    version: Option<&str>,
    release: &ReleaseDetail,
    args: &[String],
    context_args: &[String],
) -> Result<Vec<String>> {
    let mut command = Vec::new();
    match operation {
        Operation::Install => {
            command.push("install".to_string());
            command.push(chart.reference());
            if let Some(v) = version {
                command.push("--version".to_string());
                command.push(v.to_string());
            }
            command.push("--name".to_string());
            command.push(release.name.clone());
            if let Some(ns) = &release.namespace {
                command.push("--namespace".to_string());
                command.push(ns.clone());
            }
        }
        Operation::Upgrade => {
            command.push("upgrade".to_string());
            command.push(release.name.clone());
            command.push(chart.reference());
            if let Some(v) = version {
                command.push("--version".to_string());
                command.push(v.to_string());
            }
        }
        Operation::InstallOrUpgrade => return Err(GoalError::Unresolvable),
    }
    command.extend_from_slice(args);
    command.extend_from_slice(context_args);
    Ok(command)
}

/// Resolve the registration's chart and release and synthesize the option list
///
/// Returns the chart, release and synthesized arguments without running helm.
pub async fn prepare_install(
    registration: &InstallRegistration,
    config: &HelmConfiguration,
    invocation: &GoalInvocation,
) -> Result<(ChartDetail, ReleaseDetail, Vec<String>)> {
    let chart = registration
        .chart_details
        .resolve(registration, invocation)
        .await?;
    let release = registration
        .release_details
        .resolve(registration, invocation)
        .await?;

    if chart.name.trim().is_empty() {
        return Err(GoalError::Configuration(
            "chart details must name a chart".to_string(),
        ));
    }
    if release.name.trim().is_empty() {
        return Err(GoalError::Configuration(
            "release details must name a release".to_string(),
        ));
    }

    let args = synthesize_args(
        &config.global_options,
        &registration.cmd_args,
        &chart.options,
        &registration.config_files,
    );
    Ok((chart, release, args))
}

/// Run a deploy goal: refresh repositories, then install or upgrade
pub async fn execute_install(
    registration: &InstallRegistration,
    config: &HelmConfiguration,
    invocation: &GoalInvocation,
) -> Result<()> {
    let (chart, release, args) = prepare_install(registration, config, invocation).await?;

    let version = resolve_chart_version(&chart, invocation).await?;
    if version.is_none() {
        tracing::warn!(chart = %chart.name, "no chart version resolved, helm will pick the latest");
    }

    let operation =
        resolve_operation(registration.operation, &release, config, invocation).await?;

    let command = build_install_command(
        operation,
        &chart,
        version.as_deref(),
        &release,
        &args,
        &config.context_args(),
    )?;

    let options = SpawnOptions::default()
        .in_dir(invocation.project.base_dir())
        .with_env(registration.env_args.clone())
        .logging_command(config.log_command);
    let runner = invocation.runner();

    runner
        .spawn(
            &config.cmd,
            &["repo".to_string(), "update".to_string()],
            &options,
        )
        .await?
        .check("Failed to execute helm repo update!")?;

    runner
        .spawn(&config.cmd, &command, &options)
        .await?
        .check(format!("Failed to execute helm {}!", operation))?;

    tracing::info!(
        release = %release.name,
        chart = %chart.reference(),
        "helm {} completed",
        operation
    );
    Ok(())
}
