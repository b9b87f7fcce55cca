//! Integration tests for CLI commands

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run chartgoal against a project, isolated from the user's environment
fn chartgoal(project: &Path, args: &[&str]) -> Output {
    let config_home = project.join(".config-home");
    Command::new(env!("CARGO_BIN_EXE_chartgoal"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env("XDG_CONFIG_HOME", &config_home)
        .env_remove("RUST_LOG")
        .env_remove("CHARTGOAL_HELM_CMD")
        .env_remove("CHARTGOAL_KUBE_CONTEXT")
        .env_remove("CHARTGOAL_LOG_COMMAND")
        .env_remove("CHARTGOAL_GOALS")
        .env_remove("CHARTGOAL_BRANCH")
        .env_remove("CHARTGOAL_TRACKED_VERSION")
        .output()
        .expect("Failed to execute chartgoal")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A minimal chart project named `web`
fn chart_project(version: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("templates")).unwrap();
    fs::write(root.join("templates/service.yaml"), "kind: Service\n").unwrap();
    fs::write(
        root.join("Chart.yaml"),
        format!("apiVersion: v1\nname: web\ndescription: demo\nversion: {}\n", version),
    )
    .unwrap();
    fs::write(root.join("values.yaml"), "replicas: 1\n").unwrap();
    fs::write(root.join("README.md"), "# web\n").unwrap();
    temp
}

mod chart_commands {
    use super::*;

    #[test]
    fn test_detect_helm_project() {
        let project = chart_project("0.1.0");
        let output = chartgoal(project.path(), &["detect"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("is a Helm project"));
    }

    #[test]
    fn test_detect_plain_project_fails() {
        let project = TempDir::new().unwrap();
        let output = chartgoal(project.path(), &["detect"]);
        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn test_show() {
        let project = chart_project("0.1.0");
        let output = chartgoal(project.path(), &["show"]);
        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("web"));
        assert!(out.contains("0.1.0"));
    }

    #[test]
    fn test_show_without_chart_is_chart_error() {
        let project = TempDir::new().unwrap();
        let output = chartgoal(project.path(), &["show"]);
        assert_eq!(output.status.code(), Some(4));
    }

    #[test]
    fn test_set_version_preserves_other_keys() {
        let project = chart_project("0.1.0");
        let output = chartgoal(project.path(), &["set-version", "0.2.0"]);
        assert!(output.status.success());

        let content = fs::read_to_string(project.path().join("Chart.yaml")).unwrap();
        assert!(content.contains("version: 0.2.0"));
        assert!(content.contains("description: demo"));
    }

    #[test]
    fn test_next_version_on_feature_branch() {
        let project = chart_project("0.1.0");
        let output = chartgoal(
            project.path(),
            &["--branch", "feature/login", "next-version"],
        );
        assert!(output.status.success());
        let version = stdout(&output).trim().to_string();
        assert!(version.starts_with("0.1.0-feature.login."), "got {}", version);
        // yyyyMMddHHmmss
        assert_eq!(version.rsplit('.').next().unwrap().len(), 14);
    }

    #[test]
    fn test_next_version_on_default_branch() {
        let project = chart_project("1.4.2");
        let output = chartgoal(project.path(), &["--branch", "master", "next-version"]);
        assert!(output.status.success());
        let version = stdout(&output).trim().to_string();
        assert!(version.starts_with("1.4.2-master."), "got {}", version);
    }

    #[test]
    fn test_next_version_write_updates_descriptor() {
        let project = chart_project("0.3.0");
        let output = chartgoal(
            project.path(),
            &["--branch", "release/2", "next-version", "--write"],
        );
        assert!(output.status.success());
        let version = stdout(&output).trim().to_string();
        assert!(version.starts_with("0.3.0-release.2."), "got {}", version);

        let content = fs::read_to_string(project.path().join("Chart.yaml")).unwrap();
        assert!(content.contains(&format!("version: {}\n", version)), "{}", content);
        assert!(content.contains("description: demo"));
    }

    #[test]
    fn test_next_version_without_write_leaves_descriptor() {
        let project = chart_project("0.3.0");
        let output = chartgoal(project.path(), &["--branch", "main", "next-version"]);
        assert!(output.status.success());
        let content = fs::read_to_string(project.path().join("Chart.yaml")).unwrap();
        assert!(content.contains("version: 0.3.0\n"));
    }

    #[test]
    fn test_missing_project_dir_is_usage_error() {
        let temp = TempDir::new().unwrap();
        let output = chartgoal(&temp.path().join("nope"), &["show"]);
        assert_eq!(output.status.code(), Some(64));
    }
}

mod goal_commands {
    use super::*;

    const DEPLOY_GOALS: &str = r#"
deploy:
  operation: installOrUpgrade
  releaseDetails:
    name: web
    namespace: prod
  chartRegistry: chartmuseum
  configFiles:
    - values-prod.yaml
  cmdArgs:
    - timeout: 600
    - wait
"#;

    #[test]
    fn test_args_prints_synthesized_options() {
        let project = chart_project("0.1.0");
        let goals = project.path().join("goals.yaml");
        fs::write(
            &goals,
            format!(
                "helm:\n  globalOptions:\n    - timeout: 300\n{}",
                DEPLOY_GOALS
            ),
        )
        .unwrap();

        let output = chartgoal(
            project.path(),
            &["--goals", goals.to_str().unwrap(), "args"],
        );
        assert!(output.status.success());
        let args: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
        assert_eq!(
            args,
            vec!["-f", "values-prod.yaml", "--timeout", "600", "--wait"]
        );
    }

    #[test]
    fn test_deploy_without_section_is_config_error() {
        let project = chart_project("0.1.0");
        let output = chartgoal(project.path(), &["deploy"]);
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_invalid_goal_file_is_config_error() {
        let project = chart_project("0.1.0");
        let goals = project.path().join("goals.yaml");
        fs::write(&goals, "deploy: [not, a, map]\n").unwrap();
        let output = chartgoal(
            project.path(),
            &["--goals", goals.to_str().unwrap(), "args"],
        );
        assert_eq!(output.status.code(), Some(2));
    }

    #[cfg(unix)]
    mod with_fake_helm {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;

        /// Write a helm stand-in that logs its arguments and scripts responses
        fn fake_helm(dir: &Path, list_output: &str, install_code: i32) -> (PathBuf, PathBuf) {
            let log = dir.join("helm.log");
            let script = dir.join("fake-helm.sh");
            fs::write(
                &script,
                format!(
                    "#!/bin/sh\n\
                     echo \"$*\" >> \"{log}\"\n\
                     case \"$1\" in\n\
                     list) echo '{list}' ;;\n\
                     install|upgrade) exit {code} ;;\n\
                     esac\n\
                     exit 0\n",
                    log = log.display(),
                    list = list_output,
                    code = install_code,
                ),
            )
            .unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            (script, log)
        }

        fn log_lines(log: &Path) -> Vec<String> {
            fs::read_to_string(log)
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        #[test]
        fn test_deploy_upgrades_existing_release() {
            let project = chart_project("0.1.0");
            let tools = TempDir::new().unwrap();
            let (helm, log) = fake_helm(
                tools.path(),
                r#"{"Releases":[{"Name":"web","Status":"DEPLOYED"}]}"#,
                0,
            );
            let goals = project.path().join("goals.yaml");
            fs::write(&goals, DEPLOY_GOALS).unwrap();

            let output = chartgoal(
                project.path(),
                &[
                    "--goals",
                    goals.to_str().unwrap(),
                    "--helm-cmd",
                    helm.to_str().unwrap(),
                    "--kube-context",
                    "staging",
                    "deploy",
                ],
            );
            assert!(
                output.status.success(),
                "stderr: {}",
                String::from_utf8_lossy(&output.stderr)
            );

            assert_eq!(
                log_lines(&log),
                vec![
                    "list --failed --deployed --output json --kube-context staging",
                    "repo update",
                    "upgrade web chartmuseum/web --version 0.1.0 -f values-prod.yaml \
                     --timeout 600 --wait --kube-context staging",
                ]
            );
        }

        #[test]
        fn test_deploy_failure_exits_with_helm_code() {
            let project = chart_project("0.1.0");
            let tools = TempDir::new().unwrap();
            let (helm, log) = fake_helm(tools.path(), "", 3);
            let goals = project.path().join("goals.yaml");
            fs::write(&goals, DEPLOY_GOALS).unwrap();

            let output = chartgoal(
                project.path(),
                &[
                    "--goals",
                    goals.to_str().unwrap(),
                    "--helm-cmd",
                    helm.to_str().unwrap(),
                    "deploy",
                ],
            );
            assert_eq!(output.status.code(), Some(3));

            let lines = log_lines(&log);
            assert!(lines[2].starts_with("install chartmuseum/web --version 0.1.0 --name web --namespace prod"));
        }

        #[test]
        fn test_package_applies_tracked_version() {
            let project = chart_project("0.1.0");
            let tools = TempDir::new().unwrap();
            let (helm, log) = fake_helm(tools.path(), "", 0);

            let output = chartgoal(
                project.path(),
                &[
                    "--helm-cmd",
                    helm.to_str().unwrap(),
                    "--sha",
                    "abc123",
                    "--tracked-version",
                    "0.1.0-20190301120000",
                    "package",
                ],
            );
            assert!(
                output.status.success(),
                "stderr: {}",
                String::from_utf8_lossy(&output.stderr)
            );

            assert_eq!(log_lines(&log), vec!["package . --version 0.1.0-20190301120000"]);
            let build_dir = project.path().join("web");
            assert!(build_dir.join("templates/service.yaml").is_file());
            assert!(build_dir.join("README.md").is_file());
            let chart = fs::read_to_string(build_dir.join("Chart.yaml")).unwrap();
            assert!(chart.contains("version: 0.1.0-20190301120000"));
        }

        #[test]
        fn test_package_twice_fails_on_existing_build_dir() {
            let project = chart_project("0.1.0");
            let tools = TempDir::new().unwrap();
            let (helm, _log) = fake_helm(tools.path(), "", 0);
            let args = ["--helm-cmd", helm.to_str().unwrap(), "package"];

            assert!(chartgoal(project.path(), &args).status.success());
            let second = chartgoal(project.path(), &args);
            assert_eq!(second.status.code(), Some(1));
        }

        #[cfg(target_os = "linux")]
        #[test]
        fn test_user_config_sets_helm_cmd() {
            let project = chart_project("0.1.0");
            let tools = TempDir::new().unwrap();
            let (helm, log) = fake_helm(tools.path(), "", 0);
            let config_dir = project.path().join(".config-home/chartgoal");
            fs::create_dir_all(&config_dir).unwrap();
            fs::write(
                config_dir.join("config.yaml"),
                format!("cmd: {}\n", helm.display()),
            )
            .unwrap();

            let output = chartgoal(project.path(), &["package"]);
            assert!(output.status.success());
            assert_eq!(log_lines(&log), vec!["package . --version 0.1.0"]);
        }
    }
}
