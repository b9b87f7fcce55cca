//! CLI commands

pub mod args;
pub mod deploy;
pub mod detect;
pub mod next_version;
pub mod package;
pub mod set_version;
pub mod show;

use console::style;

use chartgoal_helm::{GoalDefinition, GoalOutcome};

use crate::error::{CliError, Result};

/// Print a goal outcome and turn failure into an error
fn report(goal: GoalDefinition, outcome: GoalOutcome) -> Result<()> {
    match outcome {
        GoalOutcome::Success => {
            println!("{} {}", style("✓").green().bold(), goal.completed_description);
            Ok(())
        }
        GoalOutcome::Failure { code, message } => {
            println!("{} {}", style("✗").red().bold(), goal.failed_description);
            Err(CliError::GoalFailed {
                goal: goal.unique_name.to_string(),
                code,
                message,
            })
        }
    }
}
