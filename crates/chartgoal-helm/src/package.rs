//! Helm package goal

use std::path::{Path, PathBuf};

use chartgoal_core::{assemble_build_dir, read_chart_data};

use crate::config::HelmConfiguration;
use crate::error::{GoalError, Result};
use crate::invocation::GoalInvocation;
use crate::process::SpawnOptions;
use crate::push::upload_chart;
use crate::registration::PackageRegistration;
use crate::version::resolve_package_version;

/// Build the argument list for `helm package`
pub fn build_package_command(
    registration: &PackageRegistration,
    version: Option<&str>,
) -> Vec<String> {
    let mut command = vec!["package".to_string(), registration.source_arg()];
    if let Some(v) = version {
        command.push("--version".to_string());
        command.push(v.to_string());
    }
    if let Some(app_version) = &registration.app_version {
        command.push("--app-version".to_string());
        command.push(app_version.clone());
    }
    if registration.dependency_update {
        command.push("-u".to_string());
    }
    if let Some(destination) = &registration.destination {
        command.push("-d".to_string());
        command.push(destination.display().to_string());
    }
    if let Some(key) = &registration.key {
        command.push("--key".to_string());
        command.push(key.clone());
    }
    if let Some(keyring) = &registration.keyring {
        command.push("--keyring".to_string());
        command.push(keyring.clone());
    }
    if registration.save {
        command.push("--save".to_string());
    }
    if registration.sign.is_some() {
        command.push("--sign".to_string());
    }
    command
}

/// Path of the archive helm writes for `name` at `version`
pub fn archive_path(
    build_dir: &Path,
    destination: Option<&Path>,
    name: &str,
    version: &str,
) -> PathBuf {
    let dir = match destination {
        Some(dest) => build_dir.join(dest),
        None => build_dir.to_path_buf(),
    };
    dir.join(format!("{}-{}.tgz", name, version))
}

/// Run a package goal: assemble the build directory, package, optionally upload
pub async fn execute_package(
    registration: &PackageRegistration,
    config: &HelmConfiguration,
    invocation: &GoalInvocation,
) -> Result<()> {
    tracing::info!("Determining helm chart name and version...");
    let chart = read_chart_data(&invocation.project)?;
    let version =
        resolve_package_version(registration, invocation, chart.version.as_deref()).await?;
    tracing::info!(
        "Set helm chart name and version to {}:{}",
        chart.name,
        version.as_deref().unwrap_or("<none>")
    );

    let build_dir = assemble_build_dir(
        &chart.name,
        registration.source.as_deref(),
        &invocation.project,
    )?;

    let command = build_package_command(registration, version.as_deref());
    let options = SpawnOptions::default()
        .in_dir(&build_dir)
        .logging_command(config.log_command);

    invocation
        .runner()
        .spawn(&config.cmd, &command, &options)
        .await?
        .check("Failed to execute helm package!")?;

    if let Some(push) = &registration.push {
        let version = version.ok_or_else(|| {
            GoalError::Configuration(format!(
                "cannot upload chart {}: no chart version could be determined",
                chart.name
            ))
        })?;
        let archive = archive_path(
            &build_dir,
            registration.destination.as_deref(),
            &chart.name,
            &version,
        );
        upload_chart(push, &archive).await?;
    }

    tracing::info!(chart = %chart.name, "helm package completed");
    Ok(())
}
