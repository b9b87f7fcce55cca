//! Set-version command - rewrite the version of every chart descriptor

use console::style;

use chartgoal_core::write_chart_version;

use crate::context::GlobalArgs;
use crate::error::Result;

pub fn run(global: &GlobalArgs, version: &str) -> Result<()> {
    let written = write_chart_version(&global.project(), version)?;
    for path in written {
        println!(
            "{} {} -> {}",
            style("✓").green().bold(),
            path.display(),
            style(version).yellow()
        );
    }
    Ok(())
}
