//! Next-version command - compute the version a commit should carry

use chrono::Utc;

use chartgoal_core::{project_version, read_chart_data, write_chart_version};

use crate::context::GlobalArgs;
use crate::error::{CliError, Result};

pub fn run(global: &GlobalArgs, write: bool) -> Result<()> {
    let project = global.project();
    let chart = read_chart_data(&project)?;
    let Some(base) = chart.version else {
        return Err(CliError::Chart {
            message: format!("chart {} has no version", chart.name),
            help: Some("set `version` in Chart.yaml".to_string()),
        });
    };

    let version = project_version(&base, &global.branch, Utc::now())?;
    if write {
        let paths = write_chart_version(&project, &version)?;
        tracing::info!(%version, descriptors = paths.len(), "recorded chart version");
    }
    // Plain output so pipelines can capture it
    println!("{}", version);
    Ok(())
}
