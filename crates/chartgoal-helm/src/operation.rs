//! Install-or-upgrade resolution against live release state

use chartgoal_core::{Operation, ReleaseDetail, ReleaseList};

use crate::config::HelmConfiguration;
use crate::error::{GoalError, Result};
use crate::invocation::GoalInvocation;

/// Turn the requested operation into a concrete `install` or `upgrade`
///
/// Concrete operations are returned unchanged without querying helm.
/// `installOrUpgrade` looks the release up in `helm list --failed --deployed`:
/// no entry means install, a FAILED entry is an [`GoalError::OperationConflict`],
/// any other entry means upgrade.
pub async fn resolve_operation(
    requested: Operation,
    release: &ReleaseDetail,
    config: &HelmConfiguration,
    invocation: &GoalInvocation,
) -> Result<Operation> {
    if requested.is_concrete() {
        return Ok(requested);
    }

    let releases = list_releases(config, invocation).await?;
    let resolved = match releases.find(&release.name) {
        None => Operation::Install,
        Some(entry) if entry.is_failed() => {
            return Err(GoalError::OperationConflict {
                release: release.name.clone(),
            });
        }
        Some(_) => Operation::Upgrade,
    };

    if !resolved.is_concrete() {
        return Err(GoalError::Unresolvable);
    }
    tracing::info!(release = %release.name, operation = %resolved, "resolved helm operation");
    Ok(resolved)
}

/// Query failed and deployed releases
async fn list_releases(
    config: &HelmConfiguration,
    invocation: &GoalInvocation,
) -> Result<ReleaseList> {
    let mut args: Vec<String> = ["list", "--failed", "--deployed", "--output", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.extend(config.context_args());

    let output = invocation
        .runner()
        .exec(&config.cmd, &args)
        .await?
        .check("Failed to execute helm list!")?;

    parse_release_list(&output.stdout)
}

/// Parse `helm list --output json`; empty output means no releases
pub fn parse_release_list(stdout: &str) -> Result<ReleaseList> {
    let stdout = stdout.trim();
    if stdout.is_empty() {
        return Ok(ReleaseList::default());
    }
    serde_json::from_str(stdout).map_err(|e| GoalError::ReleaseListParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chartgoal_core::Project;

    use crate::invocation::GoalEvent;
    use crate::mock::MockCommandRunner;
    use crate::process::ProcessOutput;

    const RELEASES: &str = r#"{
        "Next": "",
        "Releases": [
            {"Name": "web", "Revision": 3, "Status": "DEPLOYED", "Chart": "web-1.0.0", "Namespace": "prod"},
            {"Name": "broken", "Revision": 1, "Status": "FAILED", "Chart": "broken-0.1.0", "Namespace": "prod"}
        ]
    }"#;

    fn invocation(mock: &MockCommandRunner) -> GoalInvocation {
        GoalInvocation::new(
            Project::new("."),
            GoalEvent::default(),
            Arc::new(mock.clone()),
        )
    }

    async fn resolve(mock: &MockCommandRunner, op: Operation, name: &str) -> Result<Operation> {
        resolve_operation(
            op,
            &ReleaseDetail::new(name),
            &HelmConfiguration::default(),
            &invocation(mock),
        )
        .await
    }

    #[tokio::test]
    async fn test_concrete_operation_skips_query() {
        let mock = MockCommandRunner::new();
        assert_eq!(resolve(&mock, Operation::Install, "web").await.unwrap(), Operation::Install);
        assert_eq!(resolve(&mock, Operation::Upgrade, "web").await.unwrap(), Operation::Upgrade);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_deployed_release_upgrades() {
        let mock = MockCommandRunner::new().respond(&["list"], ProcessOutput::success(RELEASES));
        assert_eq!(
            resolve(&mock, Operation::InstallOrUpgrade, "web").await.unwrap(),
            Operation::Upgrade
        );
        assert_eq!(
            mock.call_args(),
            vec![vec!["list", "--failed", "--deployed", "--output", "json"]]
        );
    }

    #[tokio::test]
    async fn test_missing_release_installs() {
        let mock = MockCommandRunner::new().respond(&["list"], ProcessOutput::success(RELEASES));
        assert_eq!(
            resolve(&mock, Operation::InstallOrUpgrade, "api").await.unwrap(),
            Operation::Install
        );
    }

    #[tokio::test]
    async fn test_failed_release_conflicts() {
        let mock = MockCommandRunner::new().respond(&["list"], ProcessOutput::success(RELEASES));
        let err = resolve(&mock, Operation::InstallOrUpgrade, "broken").await.unwrap_err();
        assert!(matches!(err, GoalError::OperationConflict { ref release } if release == "broken"));
        assert_eq!(
            err.to_string(),
            "Helm release broken is in a failed state, cannot upgrade!"
        );
    }

    #[tokio::test]
    async fn test_empty_list_installs() {
        let mock = MockCommandRunner::new().respond(&["list"], ProcessOutput::success("\n"));
        assert_eq!(
            resolve(&mock, Operation::InstallOrUpgrade, "web").await.unwrap(),
            Operation::Install
        );
    }

    #[tokio::test]
    async fn test_malformed_list_is_fatal() {
        let mock =
            MockCommandRunner::new().respond(&["list"], ProcessOutput::success("Error: no tiller"));
        let err = resolve(&mock, Operation::InstallOrUpgrade, "web").await.unwrap_err();
        assert!(matches!(err, GoalError::ReleaseListParse(_)));
    }

    #[tokio::test]
    async fn test_list_failure_is_subprocess_error() {
        let mock = MockCommandRunner::new()
            .respond(&["list"], ProcessOutput::failure(2, "could not find tiller"));
        let err = resolve(&mock, Operation::InstallOrUpgrade, "web").await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_list_uses_configured_cmd_and_context() {
        let mock = MockCommandRunner::new();
        let config = HelmConfiguration {
            cmd: "/opt/helm".to_string(),
            context: Some("staging".to_string()),
            ..Default::default()
        };
        resolve_operation(
            Operation::InstallOrUpgrade,
            &ReleaseDetail::new("web"),
            &config,
            &invocation(&mock),
        )
        .await
        .unwrap();

        let call = &mock.calls()[0];
        assert_eq!(call.cmd, "/opt/helm");
        assert_eq!(&call.args[5..], &["--kube-context", "staging"]);
    }
}
