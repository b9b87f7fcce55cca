//! Detect command - check whether a project holds a Helm chart

use console::style;

use chartgoal_core::is_helm_project;

use crate::context::GlobalArgs;
use crate::error::{CliError, Result};

pub fn run(global: &GlobalArgs) -> Result<()> {
    let project = global.project();
    if !is_helm_project(&project) {
        return Err(CliError::NotHelmProject {
            path: project.base_dir().display().to_string(),
        });
    }
    println!(
        "{} {} is a Helm project",
        style("✓").green().bold(),
        project.base_dir().display()
    );
    Ok(())
}
