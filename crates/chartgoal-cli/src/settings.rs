//! Goal file and layered helm configuration

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use serde::Deserialize;

use chartgoal_core::{ChartDetail, Operation, OptionList, ReleaseDetail, read_chart_data};
use chartgoal_helm::{
    GoalInvocation, HelmConfiguration, HelmConfigurationLayer, InstallRegistration,
    PackageRegistration, Provided,
};

use crate::error::{CliError, Result};

/// Contents of the file given with `--goals`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFile {
    /// Helm settings layered over the user configuration
    #[serde(default)]
    pub helm: HelmConfigurationLayer,

    /// Package goal registration
    #[serde(default)]
    pub package: Option<PackageRegistration>,

    /// Deploy goal registration
    #[serde(default)]
    pub deploy: Option<DeploySection>,
}

/// `deploy:` section of a goal file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploySection {
    pub release_details: ReleaseDetail,

    /// Chart to deploy; computed from the project's Chart.yaml when absent
    #[serde(default)]
    pub chart_details: Option<ChartDetail>,

    /// Registry for a computed chart
    #[serde(default)]
    pub chart_registry: Option<String>,

    #[serde(default)]
    pub operation: Operation,

    #[serde(default)]
    pub cmd_args: OptionList,

    #[serde(default)]
    pub env_args: HashMap<String, String>,

    #[serde(default)]
    pub config_files: Vec<String>,
}

impl DeploySection {
    /// Turn the section into a deploy registration
    pub fn into_registration(self) -> InstallRegistration {
        let chart: Provided<ChartDetail, InstallRegistration> = match self.chart_details {
            Some(chart) => Provided::Literal(chart),
            None => {
                let registry = self.chart_registry;
                Provided::computed(move |_, invocation: &GoalInvocation| {
                    let registry = registry.clone();
                    let name = read_chart_data(&invocation.project).map(|c| c.name);
                    async move {
                        let mut chart = ChartDetail::new(name?);
                        chart.registry = registry;
                        Ok(chart)
                    }
                    .boxed()
                })
            }
        };

        let mut registration = InstallRegistration::new(chart, self.release_details)
            .with_operation(self.operation);
        registration.cmd_args = self.cmd_args;
        registration.env_args = self.env_args;
        registration.config_files = self.config_files;
        registration
    }
}

impl GoalFile {
    /// Load a goal file; no path means an empty goal file
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::parse(&content).map_err(|e| match e {
            CliError::Config { message, help } => CliError::Config {
                message: format!("{}: {}", path.display(), message),
                help,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| CliError::config(e.to_string()))
    }

    /// Deploy registration, required for deploy and args
    pub fn deploy_registration(&self) -> Result<InstallRegistration> {
        self.deploy
            .clone()
            .map(DeploySection::into_registration)
            .ok_or_else(|| {
                CliError::config_with_help(
                    "goal file has no deploy section",
                    "add a `deploy:` section with at least `releaseDetails.name`",
                )
            })
    }
}

/// Location of the user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chartgoal").join("config.yaml"))
}

/// Read the user configuration layer; a missing file is an empty layer
pub fn load_user_layer(path: Option<&Path>) -> Result<HelmConfigurationLayer> {
    let Some(path) = path else {
        return Ok(HelmConfigurationLayer::default());
    };
    if !path.is_file() {
        return Ok(HelmConfigurationLayer::default());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HelmConfigurationLayer::default());
    }
    tracing::debug!(path = %path.display(), "loaded user configuration");
    serde_yaml::from_str(&content)
        .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))
}

/// Merge defaults, user file, goal file and command line, lowest first
pub fn helm_configuration(
    user: HelmConfigurationLayer,
    goal_file: HelmConfigurationLayer,
    flags: HelmConfigurationLayer,
) -> HelmConfiguration {
    HelmConfiguration::layered([user, goal_file, flags])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chartgoal_core::{CliOption, Project};
    use chartgoal_helm::{GoalEvent, MockCommandRunner};
    use tempfile::TempDir;

    const GOALS: &str = r#"
helm:
  context: staging
  globalOptions:
    - tiller-namespace: tiller
package:
  push:
    registry: http://localhost:8080/api/charts
deploy:
  operation: installOrUpgrade
  releaseDetails:
    name: web
    namespace: prod
  chartRegistry: chartmuseum
  cmdArgs:
    - wait
"#;

    #[test]
    fn test_parse_goal_file() {
        let goals = GoalFile::parse(GOALS).unwrap();
        assert_eq!(goals.helm.context.as_deref(), Some("staging"));
        assert!(goals.package.unwrap().push.is_some());
        let deploy = goals.deploy.unwrap();
        assert_eq!(deploy.release_details.namespace.as_deref(), Some("prod"));
        assert!(deploy.chart_details.is_none());
    }

    #[test]
    fn test_empty_goal_file() {
        let goals = GoalFile::parse("\n").unwrap();
        assert!(goals.deploy.is_none());
        assert!(matches!(
            goals.deploy_registration(),
            Err(CliError::Config { .. })
        ));
    }

    #[test]
    fn test_invalid_goal_file_is_config_error() {
        let err = GoalFile::parse("deploy:\n  releaseDetails: [1, 2]\n").unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[tokio::test]
    async fn test_computed_chart_reads_descriptor() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Chart.yaml"), "name: web\nversion: 1.0.0\n").unwrap();
        let registration = GoalFile::parse(GOALS).unwrap().deploy_registration().unwrap();
        let invocation = GoalInvocation::new(
            Project::new(temp.path()),
            GoalEvent::default(),
            Arc::new(MockCommandRunner::new()),
        );

        let chart = registration
            .chart_details
            .resolve(&registration, &invocation)
            .await
            .unwrap();
        assert_eq!(chart.reference(), "chartmuseum/web");
        assert_eq!(registration.operation, Operation::InstallOrUpgrade);
        assert_eq!(registration.cmd_args, vec![CliOption::flag("wait")]);
    }

    #[test]
    fn test_layering() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "cmd: /usr/local/bin/helm\ncontext: dev\n").unwrap();

        let user = load_user_layer(Some(&path)).unwrap();
        let goals = GoalFile::parse(GOALS).unwrap();
        let flags = HelmConfigurationLayer {
            log_command: Some(true),
            ..Default::default()
        };

        let config = helm_configuration(user, goals.helm, flags);
        assert_eq!(config.cmd, "/usr/local/bin/helm");
        assert_eq!(config.context.as_deref(), Some("staging"));
        assert!(config.log_command);
        assert_eq!(config.global_options.len(), 1);
    }

    #[test]
    fn test_missing_user_config_is_empty() {
        let temp = TempDir::new().unwrap();
        let layer = load_user_layer(Some(&temp.path().join("nope.yaml"))).unwrap();
        assert_eq!(layer, HelmConfigurationLayer::default());
    }
}
