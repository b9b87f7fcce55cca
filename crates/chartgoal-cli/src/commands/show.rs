//! Show command - display chart name and version

use console::style;

use chartgoal_core::read_chart_data;

use crate::context::GlobalArgs;
use crate::error::Result;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let chart = read_chart_data(&global.project())?;

    println!("{}: {}", style("Name").bold(), chart.name);
    println!(
        "{}: {}",
        style("Version").bold(),
        chart.version.as_deref().unwrap_or("<none>")
    );
    Ok(())
}
